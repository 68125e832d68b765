//! Common test utilities and assertion helpers.
//!
//! Helpers for running the layout engine on fixture grids and picking
//! instructions and diagnostics out of the result.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

use xlpage::render::{DrawImage, DrawText, FillRect, StrokeRect};
use xlpage::{Diagnostic, DrawInstruction, GridModel, LayoutConfig, LayoutEngine, LayoutOutput};

// Re-export fixtures for convenience
pub use super::fixtures::*;

/// Tolerance for comparing computed lengths.
pub const EPS: f64 = 1e-6;

// ============================================================================
// Layout Helpers
// ============================================================================

/// Run the engine and panic on a hard error.
#[must_use]
pub fn layout(grid: &GridModel, config: LayoutConfig) -> LayoutOutput {
    LayoutEngine::new(config)
        .render(grid)
        .expect("layout should succeed")
}

/// Run the engine with the default configuration.
#[must_use]
pub fn layout_default(grid: &GridModel) -> LayoutOutput {
    layout(grid, LayoutConfig::default())
}

// ============================================================================
// Instruction Filters
// ============================================================================

#[must_use]
pub fn fills(output: &LayoutOutput) -> Vec<&FillRect> {
    output
        .instructions
        .iter()
        .filter_map(|i| match i {
            DrawInstruction::FillRect(f) => Some(f),
            _ => None,
        })
        .collect()
}

#[must_use]
pub fn strokes(output: &LayoutOutput) -> Vec<&StrokeRect> {
    output
        .instructions
        .iter()
        .filter_map(|i| match i {
            DrawInstruction::StrokeRect(s) => Some(s),
            _ => None,
        })
        .collect()
}

#[must_use]
pub fn images(output: &LayoutOutput) -> Vec<&DrawImage> {
    output
        .instructions
        .iter()
        .filter_map(|i| match i {
            DrawInstruction::DrawImage(d) => Some(d),
            _ => None,
        })
        .collect()
}

#[must_use]
pub fn texts(output: &LayoutOutput) -> Vec<&DrawText> {
    output
        .instructions
        .iter()
        .filter_map(|i| match i {
            DrawInstruction::DrawText(t) => Some(t),
            _ => None,
        })
        .collect()
}

/// The text instruction whose first line is `first_line`.
#[must_use]
pub fn text_starting_with<'a>(output: &'a LayoutOutput, first_line: &str) -> &'a DrawText {
    texts(output)
        .into_iter()
        .find(|t| t.lines.first().is_some_and(|l| l.starts_with(first_line)))
        .unwrap_or_else(|| panic!("no text starting with {first_line:?}"))
}

/// Serialized `op` names in emission order.
#[must_use]
pub fn kinds(output: &LayoutOutput) -> Vec<&'static str> {
    output.instructions.iter().map(DrawInstruction::kind).collect()
}

// ============================================================================
// Diagnostic Helpers
// ============================================================================

/// Count diagnostics matching a predicate.
pub fn count_diagnostics(output: &LayoutOutput, pred: impl Fn(&Diagnostic) -> bool) -> usize {
    output.diagnostics.iter().filter(|d| pred(d)).count()
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert two lengths agree within [`EPS`].
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

/// Assert a box matches `(x, y, width, height)` within [`EPS`].
#[track_caller]
pub fn assert_box(rect: &xlpage::layout::CellBox, expected: (f64, f64, f64, f64)) {
    let (x, y, w, h) = expected;
    assert_close(rect.x, x);
    assert_close(rect.y, y);
    assert_close(rect.width, w);
    assert_close(rect.height, h);
}
