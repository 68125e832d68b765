//! Draw instructions and the backends that consume them.
//!
//! This module provides:
//! - The backend-agnostic instruction list produced by the layout engine
//! - The `RenderBackend` trait that drives a backend page by page
//! - An SVG backend, one document per page

pub mod backend;
pub mod instruction;
pub mod svg;

pub use backend::{PageInfo, RenderBackend};
pub use instruction::{
    DrawImage, DrawInstruction, DrawText, FillRect, StrokeRect, CELL_PADDING,
};
pub use svg::SvgRenderer;
