//! Data types for the grid model and layout diagnostics.

mod cell;
mod diagnostic;
mod drawing;
mod grid;
mod style;

pub use cell::*;
pub use diagnostic::*;
pub use drawing::*;
pub use grid::*;
pub use style::*;
