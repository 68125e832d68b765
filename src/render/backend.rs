//! Render backend trait for pluggable output formats.
//!
//! A backend receives pages in order and the instructions of each page in
//! emission order. It must not reorder them: the layout already layered
//! fills, strokes, images and text back to front.

use crate::engine::LayoutOutput;
use crate::error::{Result, XlpageError};

use super::DrawInstruction;

/// Page being started, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageInfo {
    pub index: usize,
    pub width: f64,
    pub height: f64,
}

/// Trait for render backends
///
/// Implementations turn draw instructions into a concrete document format
/// (SVG, PDF, raster, ...).
pub trait RenderBackend {
    /// What a finished render produces
    type Output;

    /// Start a new page
    fn begin_page(&mut self, page: &PageInfo) -> Result<()>;

    /// Draw one instruction on the current page
    fn draw(&mut self, instruction: &DrawInstruction) -> Result<()>;

    /// Close the current page
    fn end_page(&mut self) -> Result<()>;

    /// Hand over everything rendered so far
    fn finish(&mut self) -> Result<Self::Output>;

    /// Drive a whole layout through the backend.
    ///
    /// Instructions must be grouped by ascending page, which is how the
    /// engine emits them. Pages without instructions are still begun and
    /// ended so page numbering stays intact.
    fn render(&mut self, output: &LayoutOutput) -> Result<Self::Output> {
        let mut instructions = output.instructions.iter().peekable();
        for index in 0..output.page_count {
            self.begin_page(&PageInfo {
                index,
                width: output.page_width,
                height: output.page_height,
            })?;
            while let Some(instruction) = instructions.next_if(|i| i.page() == index) {
                self.draw(instruction)?;
            }
            self.end_page()?;
        }
        if let Some(stray) = instructions.next() {
            return Err(XlpageError::Render(format!(
                "{} instruction for page {} is out of order",
                stray.kind(),
                stray.page()
            )));
        }
        self.finish()
    }
}
