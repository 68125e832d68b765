//! Resolution of the rectangle of cells that gets rendered.

use crate::page_setup::LayoutConfig;
use crate::types::{CellCoord, CellRange, Diagnostic, Diagnostics, GeometrySource, GridModel};

/// The smallest region: the single cell A1.
pub const MIN_REGION: CellRange = CellRange::new(CellCoord::new(1, 1), CellCoord::new(1, 1));

/// Pick the addressed region for a render.
///
/// Precedence is the configured region, then the grid's print area, then the
/// bounding box of everything that draws ink. The result always lies inside
/// the grid; an explicit region that had to be clamped is reported.
pub fn resolve_region(
    grid: &GridModel,
    config: &LayoutConfig,
    diagnostics: &mut Diagnostics,
) -> CellRange {
    let Some(bounds) = grid.bounds() else {
        return MIN_REGION;
    };

    if let Some(requested) = config.addressed_region.or(grid.print_area) {
        let requested = CellRange::normalized(requested.top_left, requested.bottom_right);
        let clamped = requested.clamped_to(&bounds);
        if clamped != requested {
            diagnostics.push(Diagnostic::MalformedGeometry {
                source: GeometrySource::AddressedRegion,
                original: requested,
                resolved: Some(clamped),
            });
        }
        return clamped;
    }

    data_bounds(grid).map_or(MIN_REGION, |r| r.clamped_to(&bounds))
}

/// Bounding box of non-empty values, styled cells, merges and image anchors.
pub fn data_bounds(grid: &GridModel) -> Option<CellRange> {
    let cells = grid
        .rows
        .iter()
        .flat_map(|row| &row.cells)
        .filter(|cell| cell.has_text() || cell.style.is_some() || cell.image_ref.is_some())
        .map(|cell| {
            let at = cell.coord();
            CellRange::new(at, at)
        });
    let merges = grid.merges.iter().map(|m| m.range());
    let anchors = grid
        .image_anchors
        .iter()
        .map(|a| CellRange::normalized(a.top_left, a.bottom_right));

    cells
        .chain(merges)
        .chain(anchors)
        .reduce(|acc, r| {
            CellRange::new(
                CellCoord::new(
                    acc.top_left.row.min(r.top_left.row),
                    acc.top_left.col.min(r.top_left.col),
                ),
                CellCoord::new(
                    acc.bottom_right.row.max(r.bottom_right.row),
                    acc.bottom_right.col.max(r.bottom_right.col),
                ),
            )
        })
}
