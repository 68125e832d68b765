//! Distribution of rows over pages.

use crate::page_setup::PaginationPolicy;

/// Tolerance for height comparisons, so a page filled exactly stays one page.
pub const EPSILON: f64 = 1e-6;

/// A run of rows that must land on the same page, as region-relative indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBlock {
    pub first: usize,
    pub last: usize,
}

/// A block taller than a page, placed anyway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overflow {
    pub page: usize,
    pub block: RowBlock,
    pub height: f64,
}

/// Where each row ends up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PagePlan {
    /// Page index per row
    pub row_to_page: Vec<usize>,
    /// Top of each row relative to its page, top margin included
    pub row_offsets: Vec<f64>,
    pub page_count: usize,
    pub overflows: Vec<Overflow>,
}

/// Splits a column of row heights into pages.
#[derive(Debug, Clone, Copy)]
pub struct PaginationPlanner {
    policy: PaginationPolicy,
    /// Usable height of one page
    capacity: f64,
    /// Offset of the first row on every page
    origin: f64,
}

impl PaginationPlanner {
    pub fn new(policy: PaginationPolicy, capacity: f64, origin: f64) -> Self {
        Self {
            policy,
            capacity,
            origin,
        }
    }

    /// Assign every row to a page.
    ///
    /// `keep_together` lists inclusive row index spans that must not be split.
    /// Overlapping or chained spans are fused into one block.
    pub fn plan(&self, heights: &[f64], keep_together: &[(usize, usize)]) -> PagePlan {
        let mut plan = PagePlan {
            row_to_page: Vec::with_capacity(heights.len()),
            row_offsets: Vec::with_capacity(heights.len()),
            page_count: 1,
            overflows: Vec::new(),
        };

        match self.policy {
            PaginationPolicy::SinglePageForced => {
                let mut y = self.origin;
                for h in heights {
                    plan.row_to_page.push(0);
                    plan.row_offsets.push(y);
                    y += h;
                }
            }
            PaginationPolicy::Flowing => {
                let mut page = 0;
                let mut used = 0.0;
                for block in blocks(heights.len(), keep_together) {
                    let block_heights = heights.get(block.first..=block.last).unwrap_or(&[]);
                    let block_height: f64 = block_heights.iter().sum();

                    if used > 0.0 && used + block_height > self.capacity + EPSILON {
                        page += 1;
                        used = 0.0;
                    }
                    if block_height > self.capacity + EPSILON {
                        plan.overflows.push(Overflow {
                            page,
                            block,
                            height: block_height,
                        });
                    }
                    for h in block_heights {
                        plan.row_to_page.push(page);
                        plan.row_offsets.push(self.origin + used);
                        used += h;
                    }
                }
                plan.page_count = page + 1;
            }
        }

        plan
    }
}

/// Fuse keep-together spans into consecutive blocks covering `0..len`.
pub fn blocks(len: usize, keep_together: &[(usize, usize)]) -> Vec<RowBlock> {
    let mut reach: Vec<usize> = (0..len).collect();
    for &(a, b) in keep_together {
        let (first, last) = (a.min(b), a.max(b).min(len.saturating_sub(1)));
        if let Some(r) = reach.get_mut(first) {
            *r = (*r).max(last);
        }
    }

    let mut out = Vec::new();
    let mut first = 0;
    while first < len {
        let mut last = first;
        let mut i = first;
        while i <= last {
            last = last.max(reach.get(i).copied().unwrap_or(i));
            i += 1;
        }
        out.push(RowBlock { first, last });
        first = last + 1;
    }
    out
}
