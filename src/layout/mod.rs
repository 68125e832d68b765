//! Layout of the addressed region onto pages.
//!
//! This module handles:
//! - Choosing the rendered region (explicit, print area or data bounds)
//! - Indexing merge regions for O(1) membership tests
//! - Scaling column widths and row heights onto the page
//! - Splitting rows over pages without breaking merged blocks

mod geometry;
mod merges;
mod pagination;
mod region;

pub use geometry::{CellBox, GeometryResolver, PageGeometry};
pub use merges::{MergeIndex, MergeInfo};
pub use pagination::{blocks, Overflow, PagePlan, PaginationPlanner, RowBlock, EPSILON};
pub use region::{data_bounds, resolve_region, MIN_REGION};
