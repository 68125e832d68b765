//! Merge region lookup.

use std::collections::HashMap;

use crate::types::{CellCoord, CellRange, Diagnostic, Diagnostics, GeometrySource, MergeRegion};

/// Information about a merged cell region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeInfo {
    /// True if this cell is the top-left origin of the merge
    pub is_origin: bool,
    /// The whole region, already clamped to the rendered area
    pub range: CellRange,
}

/// Every cell covered by a merge, keyed by coordinate.
///
/// Regions are stored in input order so iteration never depends on hash
/// order; the map only answers membership.
#[derive(Debug, Clone, Default)]
pub struct MergeIndex {
    regions: Vec<CellRange>,
    cells: HashMap<CellCoord, usize>,
}

impl MergeIndex {
    /// Build the index for merges that survive clamping.
    ///
    /// Merges are clamped to `bounds` (the grid) with a diagnostic, then cut
    /// to `region` silently, since a print area is allowed to slice through
    /// a merge. One-cell leftovers are not merges. A region overlapping an
    /// earlier one is dropped.
    pub fn build(
        merges: &[MergeRegion],
        bounds: Option<&CellRange>,
        region: &CellRange,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut index = Self::default();

        for merge in merges {
            let original = merge.range();
            let in_grid = match bounds {
                Some(b) => {
                    let clamped = original.intersection(b);
                    if clamped != Some(original) {
                        diagnostics.push(Diagnostic::MalformedGeometry {
                            source: GeometrySource::Merge,
                            original,
                            resolved: clamped,
                        });
                    }
                    clamped
                }
                None => None,
            };
            let Some(range) = in_grid.and_then(|r| r.intersection(region)) else {
                continue;
            };
            if range.is_single_cell() {
                continue;
            }
            if index.overlaps(&range) {
                diagnostics.push(Diagnostic::MalformedGeometry {
                    source: GeometrySource::Merge,
                    original,
                    resolved: None,
                });
                continue;
            }
            index.insert(range);
        }

        index
    }

    fn overlaps(&self, range: &CellRange) -> bool {
        self.regions.iter().any(|r| r.intersects(range))
    }

    fn insert(&mut self, range: CellRange) {
        let slot = self.regions.len();
        for row in range.top_left.row..=range.bottom_right.row {
            for col in range.top_left.col..=range.bottom_right.col {
                self.cells.insert(CellCoord::new(row, col), slot);
            }
        }
        self.regions.push(range);
    }

    /// Merge info for a cell, if it is covered by one
    pub fn get(&self, at: CellCoord) -> Option<MergeInfo> {
        let slot = *self.cells.get(&at)?;
        let range = *self.regions.get(slot)?;
        Some(MergeInfo {
            is_origin: range.top_left == at,
            range,
        })
    }

    /// True for cells swallowed by a merge other than its origin.
    pub fn is_absorbed(&self, at: CellCoord) -> bool {
        self.get(at).is_some_and(|m| !m.is_origin)
    }

    /// The coordinate a cell renders under: its merge origin or itself.
    pub fn anchor_of(&self, at: CellCoord) -> CellCoord {
        self.get(at).map_or(at, |m| m.range.top_left)
    }

    /// Surviving regions in input order.
    pub fn regions(&self) -> &[CellRange] {
        &self.regions
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn merge(r1: u32, c1: u32, r2: u32, c2: u32) -> MergeRegion {
        MergeRegion {
            top_left: CellCoord::new(r1, c1),
            bottom_right: CellCoord::new(r2, c2),
        }
    }

    fn range(r1: u32, c1: u32, r2: u32, c2: u32) -> CellRange {
        CellRange::new(CellCoord::new(r1, c1), CellCoord::new(r2, c2))
    }

    #[test]
    fn test_origin_and_absorbed() {
        let bounds = range(1, 1, 10, 10);
        let mut diags = Diagnostics::new();
        let index = MergeIndex::build(&[merge(2, 2, 3, 4)], Some(&bounds), &bounds, &mut diags);

        assert!(diags.is_empty());
        assert!(index.get(CellCoord::new(2, 2)).unwrap().is_origin);
        assert!(index.is_absorbed(CellCoord::new(3, 4)));
        assert!(!index.is_absorbed(CellCoord::new(1, 1)));
        assert_eq!(index.anchor_of(CellCoord::new(3, 3)), CellCoord::new(2, 2));
        assert_eq!(index.anchor_of(CellCoord::new(5, 5)), CellCoord::new(5, 5));
    }

    #[test]
    fn test_out_of_grid_is_clamped_with_diagnostic() {
        let bounds = range(1, 1, 5, 5);
        let mut diags = Diagnostics::new();
        let index = MergeIndex::build(&[merge(4, 4, 8, 8)], Some(&bounds), &bounds, &mut diags);

        assert_eq!(index.regions(), &[range(4, 4, 5, 5)]);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_region_cut_is_silent_and_single_cells_dropped() {
        let bounds = range(1, 1, 10, 10);
        let region = range(1, 1, 3, 3);
        let mut diags = Diagnostics::new();
        let index = MergeIndex::build(
            &[merge(2, 2, 5, 5), merge(3, 3, 6, 6)],
            Some(&bounds),
            &region,
            &mut diags,
        );

        assert_eq!(index.regions(), &[range(2, 2, 3, 3)]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_overlap_keeps_first() {
        let bounds = range(1, 1, 10, 10);
        let mut diags = Diagnostics::new();
        let index = MergeIndex::build(
            &[merge(1, 1, 2, 2), merge(2, 2, 3, 3)],
            Some(&bounds),
            &bounds,
            &mut diags,
        );

        assert_eq!(index.regions().len(), 1);
        assert_eq!(diags.len(), 1);
    }
}
