//! Page geometry for the addressed region.
//!
//! Positions are computed once per render: scaled column widths and row
//! heights, cumulative column offsets from the left margin, and per-row
//! offsets from the top margin of the row's page. Everything after this is a
//! read-only lookup.

use std::collections::BTreeMap;

use serde::Serialize;

use super::pagination::{Overflow, PaginationPlanner};
use crate::page_setup::{LayoutConfig, PaginationPolicy, WidthUpscalePolicy};
use crate::types::{CellCoord, CellRange, GridModel};

/// Rectangle of a cell or span on a page, in points
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct CellBox {
    pub page: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CellBox {
    /// True when the box has no visible area (hidden row or column).
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Resolved geometry of the addressed region.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGeometry {
    pub region: CellRange,
    pub page_width: f64,
    pub page_height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Factor applied to font sizes, `min(scale_x, scale_y)`
    pub font_scale: f64,
    /// Scaled column widths (0 for hidden columns)
    pub col_widths: Vec<f64>,
    /// Cumulative column positions; one more entry than `col_widths`
    pub col_positions: Vec<f64>,
    /// Scaled row heights (0 for hidden rows)
    pub row_heights: Vec<f64>,
    /// Top of each row relative to its page
    pub row_offsets: Vec<f64>,
    pub row_to_page: Vec<usize>,
    pub page_count: usize,
    /// Keep-together blocks that did not fit on one page
    pub overflows: Vec<Overflow>,
}

/// Turns grid dimensions and a page setup into a [`PageGeometry`].
#[derive(Debug, Clone, Copy)]
pub struct GeometryResolver<'a> {
    config: &'a LayoutConfig,
}

impl<'a> GeometryResolver<'a> {
    pub fn new(config: &'a LayoutConfig) -> Self {
        Self { config }
    }

    /// Nominal (unscaled) width in points of every column in `region`.
    pub fn nominal_widths(&self, grid: &GridModel, region: &CellRange) -> Vec<f64> {
        let mut explicit: BTreeMap<u32, f64> = BTreeMap::new();
        for column in &grid.columns {
            if let Some(w) = column.width.filter(|w| w.is_finite() && *w >= 0.0) {
                explicit.entry(column.index).or_insert(w);
            }
        }
        let unit = self.config.width_unit_points;
        (region.top_left.col..=region.bottom_right.col)
            .map(|col| {
                explicit
                    .get(&col)
                    .copied()
                    .unwrap_or(self.config.default_column_width)
                    * unit
            })
            .collect()
    }

    /// Nominal (unscaled) height in points of every row in `region`.
    pub fn nominal_heights(&self, grid: &GridModel, region: &CellRange) -> Vec<f64> {
        let mut explicit: BTreeMap<u32, f64> = BTreeMap::new();
        for row in &grid.rows {
            if let Some(h) = row.height.filter(|h| h.is_finite() && *h >= 0.0) {
                explicit.entry(row.index).or_insert(h);
            }
        }
        (region.top_left.row..=region.bottom_right.row)
            .map(|row| {
                explicit
                    .get(&row)
                    .copied()
                    .unwrap_or(self.config.default_row_height)
            })
            .collect()
    }

    /// Scale the region onto the page and paginate its rows.
    ///
    /// `keep_together` holds absolute row spans (vertical merges, tall
    /// images) that must not be split across pages.
    pub fn resolve(
        &self,
        grid: &GridModel,
        region: &CellRange,
        keep_together: &[(u32, u32)],
    ) -> PageGeometry {
        let page = &self.config.page;
        let (page_width, page_height) = page.page_size();
        let available_width = page.available_width();
        let available_height = page.available_height();

        let mut widths = self.nominal_widths(grid, region);
        let mut heights = self.nominal_heights(grid, region);

        // All columns (or rows) hidden: fall back to one default-sized cell.
        if widths.iter().sum::<f64>() <= 0.0 {
            if let Some(first) = widths.first_mut() {
                *first = self.config.default_column_width * self.config.width_unit_points;
            }
        }
        if heights.iter().sum::<f64>() <= 0.0 {
            if let Some(first) = heights.first_mut() {
                *first = self.config.default_row_height;
            }
        }
        let total_width: f64 = widths.iter().sum();
        let total_height: f64 = heights.iter().sum();

        let fit_x = available_width / total_width;
        let scale_x = match self.config.width_upscale {
            WidthUpscalePolicy::Allow => fit_x,
            WidthUpscalePolicy::ClampToOriginal => fit_x.min(1.0),
        };
        let scale_y = match self.config.pagination {
            PaginationPolicy::SinglePageForced => available_height / total_height,
            PaginationPolicy::Flowing => 1.0,
        };
        let font_scale = scale_x.min(scale_y);

        for w in &mut widths {
            *w *= scale_x;
        }
        for h in &mut heights {
            *h *= scale_y;
        }

        let mut col_positions = Vec::with_capacity(widths.len() + 1);
        let mut x = page.margins.left;
        for w in &widths {
            col_positions.push(x);
            x += w;
        }
        col_positions.push(x); // Final edge

        let first_row = region.top_left.row;
        let spans: Vec<(usize, usize)> = keep_together
            .iter()
            .filter_map(|&(a, b)| {
                let a = usize::try_from(a.checked_sub(first_row)?).ok()?;
                let b = usize::try_from(b.checked_sub(first_row)?).ok()?;
                Some((a, b))
            })
            .collect();
        let plan = PaginationPlanner::new(self.config.pagination, available_height, page.margins.top)
            .plan(&heights, &spans);

        log::debug!(
            "geometry {region}: scale {scale_x:.4}x{scale_y:.4}, {} page(s)",
            plan.page_count
        );

        PageGeometry {
            region: *region,
            page_width,
            page_height,
            scale_x,
            scale_y,
            font_scale,
            col_widths: widths,
            col_positions,
            row_heights: heights,
            row_offsets: plan.row_offsets,
            row_to_page: plan.row_to_page,
            page_count: plan.page_count,
            overflows: plan.overflows,
        }
    }
}

impl PageGeometry {
    fn col_index(&self, col: u32) -> Option<usize> {
        let i = col.checked_sub(self.region.top_left.col)?;
        usize::try_from(i).ok().filter(|i| *i < self.col_widths.len())
    }

    fn row_index(&self, row: u32) -> Option<usize> {
        let i = row.checked_sub(self.region.top_left.row)?;
        usize::try_from(i).ok().filter(|i| *i < self.row_heights.len())
    }

    /// Left edge of a column.
    pub fn col_x(&self, col: u32) -> Option<f64> {
        self.col_positions.get(self.col_index(col)?).copied()
    }

    /// Top edge of a row on its page.
    pub fn row_y(&self, row: u32) -> Option<f64> {
        self.row_offsets.get(self.row_index(row)?).copied()
    }

    pub fn page_of(&self, row: u32) -> Option<usize> {
        self.row_to_page.get(self.row_index(row)?).copied()
    }

    /// Box of a single cell, ignoring merges.
    pub fn cell_box(&self, at: CellCoord) -> Option<CellBox> {
        self.span_box(&CellRange::new(at, at))
    }

    /// Box covering a span of cells, clipped to the region.
    ///
    /// Sizes are sums of the spanned scaled widths and heights. The box sits
    /// on the page of its top row.
    pub fn span_box(&self, span: &CellRange) -> Option<CellBox> {
        let span = span.intersection(&self.region)?;
        let c0 = self.col_index(span.top_left.col)?;
        let c1 = self.col_index(span.bottom_right.col)?;
        let r0 = self.row_index(span.top_left.row)?;
        let r1 = self.row_index(span.bottom_right.row)?;

        Some(CellBox {
            page: *self.row_to_page.get(r0)?,
            x: *self.col_positions.get(c0)?,
            y: *self.row_offsets.get(r0)?,
            width: self.col_widths.get(c0..=c1)?.iter().sum(),
            height: self.row_heights.get(r0..=r1)?.iter().sum(),
        })
    }

    /// Total scaled width of the region.
    pub fn content_width(&self) -> f64 {
        self.col_widths.iter().sum()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Rows of the region placed on `page`, in order.
    pub fn rows_on_page(&self, page: usize) -> impl Iterator<Item = u32> + '_ {
        let first = self.region.top_left.row;
        (first..=self.region.bottom_right.row).filter(move |&row| self.page_of(row) == Some(page))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::page_setup::{PageMargins, PaperSize};
    use crate::types::{Column, Row};

    fn config(width: f64, height: f64) -> LayoutConfig {
        let mut config = LayoutConfig {
            width_unit_points: 1.0,
            ..Default::default()
        };
        config.page.paper = PaperSize::Custom { width, height };
        config.page.margins = PageMargins::uniform(0.0);
        config
    }

    fn grid(rows: u32, cols: u32) -> GridModel {
        GridModel {
            row_count: rows,
            column_count: cols,
            columns: (1..=cols)
                .map(|index| Column {
                    index,
                    width: Some(10.0),
                })
                .collect(),
            rows: (1..=rows)
                .map(|index| Row {
                    index,
                    height: Some(10.0),
                    cells: Vec::new(),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn whole(grid: &GridModel) -> CellRange {
        grid.bounds().unwrap()
    }

    #[test]
    fn test_no_scaling_when_page_is_wide_enough() {
        let config = config(30.0, 30.0);
        let grid = grid(3, 3);
        let geometry = GeometryResolver::new(&config).resolve(&grid, &whole(&grid), &[]);
        assert_eq!(geometry.scale_x, 1.0);
        assert_eq!(geometry.col_positions, vec![0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_shrink_to_width() {
        let config = config(15.0, 300.0);
        let grid = grid(3, 3);
        let geometry = GeometryResolver::new(&config).resolve(&grid, &whole(&grid), &[]);
        assert_eq!(geometry.scale_x, 0.5);
        assert!((geometry.content_width() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_upscale_policy() {
        let mut config = config(60.0, 300.0);
        let grid = grid(3, 3);
        let clamped = GeometryResolver::new(&config).resolve(&grid, &whole(&grid), &[]);
        assert_eq!(clamped.scale_x, 1.0);

        config.width_upscale = WidthUpscalePolicy::Allow;
        let grown = GeometryResolver::new(&config).resolve(&grid, &whole(&grid), &[]);
        assert_eq!(grown.scale_x, 2.0);
    }

    #[test]
    fn test_forced_height_fit_scales_both_ways() {
        let config = config(30.0, 60.0);
        let grid = grid(3, 3);
        let geometry = GeometryResolver::new(&config).resolve(&grid, &whole(&grid), &[]);
        assert_eq!(geometry.scale_y, 2.0);
        assert_eq!(geometry.font_scale, 1.0);
        assert_eq!(geometry.row_offsets, vec![0.0, 20.0, 40.0]);
    }

    #[test]
    fn test_span_box_sums_members() {
        let config = config(30.0, 30.0);
        let grid = grid(3, 3);
        let geometry = GeometryResolver::new(&config).resolve(&grid, &whole(&grid), &[]);
        let span = CellRange::new(CellCoord::new(1, 2), CellCoord::new(3, 3));
        let b = geometry.span_box(&span).unwrap();
        assert_eq!((b.x, b.y, b.width, b.height), (10.0, 0.0, 20.0, 30.0));
        assert!(geometry.cell_box(CellCoord::new(4, 1)).is_none());
    }

    #[test]
    fn test_margins_seed_offsets() {
        let mut config = config(100.0, 100.0);
        config.page.margins = PageMargins {
            left: 7.0,
            right: 0.0,
            top: 5.0,
            bottom: 0.0,
        };
        config.pagination = PaginationPolicy::Flowing;
        let grid = grid(2, 2);
        let geometry = GeometryResolver::new(&config).resolve(&grid, &whole(&grid), &[]);
        assert_eq!(geometry.col_x(1), Some(7.0));
        assert_eq!(geometry.row_y(2), Some(15.0));
    }

    #[test]
    fn test_hidden_everything_uses_placeholder() {
        let config = config(100.0, 100.0);
        let mut grid = grid(1, 2);
        for column in &mut grid.columns {
            column.width = Some(0.0);
        }
        let geometry = GeometryResolver::new(&config).resolve(&grid, &whole(&grid), &[]);
        assert!(geometry.scale_x.is_finite());
        assert!(geometry.col_widths[0] > 0.0);
        assert_eq!(geometry.col_widths[1], 0.0);
    }
}
