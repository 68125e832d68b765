//! Tests for cell fills and color handling.
//!
//! Fill codes are ARGB. Fully transparent black and opaque white both mean
//! "nothing to paint"; unparseable codes fall back to no fill and are
//! reported.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_lossless
)]

mod common;
mod fixtures;

use common::{count_diagnostics, fills, layout, texts};
use fixtures::{flowing_config, GridBuilder, StyleBuilder};
use test_case::test_case;
use xlpage::color::Rgb;
use xlpage::{CellCoord, Diagnostic};

fn single_fill(code: &str) -> xlpage::LayoutOutput {
    let grid = GridBuilder::new(1, 1)
        .all_col_widths(40.0)
        .styled_cell("A1", "x", StyleBuilder::new().fill(code))
        .build();
    layout(&grid, flowing_config(100.0, 100.0))
}

// ============================================================================
// SENTINELS
// ============================================================================

#[test_case("FFFFFFFF" ; "opaque white")]
#[test_case("00000000" ; "transparent black")]
#[test_case("" ; "explicit empty")]
fn test_no_fill_sentinels(code: &str) {
    let output = single_fill(code);
    assert!(fills(&output).is_empty());
    assert!(output.diagnostics.is_empty());
}

#[test_case("FFFF0000", Rgb::new(255, 0, 0) ; "argb red")]
#[test_case("FF00FF00", Rgb::new(0, 255, 0) ; "argb green")]
#[test_case("0000FF", Rgb::new(0, 0, 255) ; "rgb blue")]
#[test_case("80FFFFFF", Rgb::new(255, 255, 255) ; "translucent white still paints")]
fn test_solid_fill(code: &str, expected: Rgb) {
    let output = single_fill(code);
    let fills = fills(&output);
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].color, expected);
}

// ============================================================================
// INVALID COLORS
// ============================================================================

#[test]
fn test_invalid_fill_reported_and_skipped() {
    let output = single_fill("not-a-color");

    assert!(fills(&output).is_empty());
    assert_eq!(
        output.diagnostics,
        vec![Diagnostic::InvalidColor {
            cell: Some(CellCoord::new(1, 1)),
            value: "not-a-color".to_string(),
        }]
    );
}

#[test]
fn test_invalid_font_color_falls_back_to_black() {
    let grid = GridBuilder::new(1, 1)
        .all_col_widths(40.0)
        .styled_cell("A1", "x", StyleBuilder::new().font_color("ZZZ"))
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));

    assert_eq!(texts(&output)[0].color, Rgb::new(0, 0, 0));
    assert_eq!(
        count_diagnostics(&output, |d| matches!(d, Diagnostic::InvalidColor { .. })),
        1
    );
}

#[test]
fn test_invalid_default_style_color_reported_once() {
    let grid = GridBuilder::new(2, 2)
        .all_col_widths(40.0)
        .cell("A1", "a")
        .cell("B2", "b")
        .default_style(StyleBuilder::new().fill("#12"))
        .build();
    let output = layout(&grid, flowing_config(200.0, 200.0));

    assert!(fills(&output).is_empty());
    assert_eq!(
        output.diagnostics,
        vec![Diagnostic::InvalidColor {
            cell: None,
            value: "#12".to_string(),
        }]
    );
}

// ============================================================================
// INHERITANCE
// ============================================================================

#[test]
fn test_default_fill_applies_to_every_cell() {
    let grid = GridBuilder::new(2, 2)
        .all_col_widths(40.0)
        .cell("A1", "a")
        .cell("B2", "b")
        .default_style(StyleBuilder::new().fill("FFFFFF00"))
        .build();
    let output = layout(&grid, flowing_config(200.0, 200.0));

    // Empty cells in the region get the default fill too.
    let fills = fills(&output);
    assert_eq!(fills.len(), 4);
    assert!(fills.iter().all(|f| f.color == Rgb::new(255, 255, 0)));
}

#[test]
fn test_cell_can_switch_off_default_fill() {
    let grid = GridBuilder::new(1, 2)
        .all_col_widths(40.0)
        .styled_cell("A1", "plain", StyleBuilder::new().fill(""))
        .cell("B1", "yellow")
        .default_style(StyleBuilder::new().fill("FFFFFF00"))
        .build();
    let output = layout(&grid, flowing_config(200.0, 200.0));

    let fills = fills(&output);
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].rect.x, 40.0);
}

#[test]
fn test_fills_precede_text() {
    let grid = GridBuilder::new(1, 2)
        .all_col_widths(40.0)
        .styled_cell("A1", "a", StyleBuilder::new().fill("FF0000FF"))
        .styled_cell("B1", "b", StyleBuilder::new().fill("FF00FF00"))
        .build();
    let output = layout(&grid, flowing_config(200.0, 200.0));

    assert_eq!(
        common::kinds(&output),
        vec!["fillRect", "fillRect", "drawText", "drawText"]
    );
}
