//! Tests for embedded images.
//!
//! Images come from two places: the anchor list (a picture floating over a
//! cell range) and in-cell pictures referenced by a cell. Either way the
//! image lands on a key cell, whose text it replaces.
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

use common::{assert_box, assert_close, count_diagnostics, images, layout, texts};
use fixtures::{corrupt_png, flowing_config, png, GridBuilder};
use xlpage::{CellCoord, Diagnostic, GeometrySource, ImageFormat};

fn decode_failures(output: &xlpage::LayoutOutput) -> Vec<&Diagnostic> {
    output
        .diagnostics
        .iter()
        .filter(|d| matches!(d, Diagnostic::ResourceDecodeFailure { .. }))
        .collect()
}

// ============================================================================
// ANCHORED IMAGES
// ============================================================================

#[test]
fn test_image_replaces_cell_text() {
    let grid = GridBuilder::new(6, 3)
        .all_col_widths(40.0)
        .all_row_heights(10.0)
        .cell("A1", "Label")
        .cell("B5", "Total")
        .image("logo", png(40, 20))
        .anchor("B5:C6", "logo")
        .build();
    let output = layout(&grid, flowing_config(200.0, 100.0));

    let images = images(&output);
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].image_id, "logo");
    assert_eq!(images[0].format, ImageFormat::Png);
    assert_eq!((images[0].pixel_width, images[0].pixel_height), (40, 20));
    assert_box(&images[0].rect, (40.0, 40.0, 80.0, 20.0));

    let texts = texts(&output);
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].lines, vec!["Label"]);
}

#[test]
fn test_image_drawn_after_fills_before_text() {
    let grid = GridBuilder::new(2, 2)
        .all_col_widths(20.0)
        .cell("A1", "text")
        .image("pic", png(10, 10))
        .anchor("B2:B2", "pic")
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));
    assert_eq!(common::kinds(&output), vec!["drawImage", "drawText"]);
}

#[test]
fn test_image_keeps_aspect_ratio() {
    let grid = GridBuilder::new(2, 2)
        .all_col_widths(40.0)
        .all_row_heights(10.0)
        .image("wide", png(100, 10))
        .anchor("A1:B2", "wide")
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));

    let (x, y, w, h) = images(&output)[0].fitted();
    // 80x20 box, 10:1 image: width bound.
    assert_close(w, 80.0);
    assert_close(h, 8.0);
    assert_close(x, 0.0);
    assert_close(y, 6.0);
}

#[test]
fn test_anchor_outside_region_is_skipped() {
    let grid = GridBuilder::new(10, 3)
        .all_col_widths(20.0)
        .cell("A1", "a")
        .image("pic", png(10, 10))
        .anchor("C9:C10", "pic")
        .print_area("A1:B2")
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));

    assert!(images(&output).is_empty());
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_anchor_past_grid_is_clamped() {
    let grid = GridBuilder::new(2, 2)
        .all_col_widths(20.0)
        .image("pic", png(10, 10))
        .anchor("A1:F8", "pic")
        .print_area("A1:B2")
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));

    assert_eq!(images(&output).len(), 1);
    assert_box(&images(&output)[0].rect, (0.0, 0.0, 40.0, 30.0));
    assert_eq!(
        count_diagnostics(&output, |d| matches!(
            d,
            Diagnostic::MalformedGeometry {
                source: GeometrySource::ImageAnchor,
                ..
            }
        )),
        1
    );
}

// ============================================================================
// DECODE FAILURES
// ============================================================================

#[test]
fn test_broken_payload_falls_back_to_text() {
    let grid = GridBuilder::new(1, 1)
        .all_col_widths(40.0)
        .cell("A1", "Total")
        .image("broken", b"definitely not an image".to_vec())
        .anchor("A1:A1", "broken")
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));

    assert!(images(&output).is_empty());
    assert_eq!(texts(&output)[0].lines, vec!["Total"]);
    let failures = decode_failures(&output);
    assert_eq!(failures.len(), 1);
    match failures[0] {
        Diagnostic::ResourceDecodeFailure {
            image_id, anchor, ..
        } => {
            assert_eq!(image_id, "broken");
            assert_eq!(*anchor, CellCoord::new(1, 1));
        }
        other => panic!("unexpected diagnostic {other:?}"),
    }
}

#[test]
fn test_truncated_png_is_reported() {
    let mut data = png(10, 10);
    data.truncate(12);
    let grid = GridBuilder::new(1, 1)
        .image("short", data)
        .anchor("A1:A1", "short")
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));

    assert!(images(&output).is_empty());
    assert_eq!(decode_failures(&output).len(), 1);
}

#[test]
fn test_corrupt_body_behind_valid_header_keeps_text() {
    let grid = GridBuilder::new(6, 3)
        .all_col_widths(40.0)
        .all_row_heights(10.0)
        .cell("B5", "Total")
        .image("logo", corrupt_png(40, 20))
        .anchor("B5:C6", "logo")
        .build();
    let output = layout(&grid, flowing_config(200.0, 100.0));

    assert!(images(&output).is_empty());
    assert_eq!(texts(&output)[0].lines, vec!["Total"]);
    let failures = decode_failures(&output);
    assert_eq!(failures.len(), 1);
    match failures[0] {
        Diagnostic::ResourceDecodeFailure {
            image_id, anchor, ..
        } => {
            assert_eq!(image_id, "logo");
            assert_eq!(*anchor, CellCoord::new(5, 2));
        }
        other => panic!("unexpected diagnostic {other:?}"),
    }
}

#[test]
fn test_missing_image_id_is_reported() {
    let grid = GridBuilder::new(1, 1)
        .cell("A1", "x")
        .anchor("A1:A1", "nowhere")
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));

    assert!(images(&output).is_empty());
    assert_eq!(decode_failures(&output).len(), 1);
}

// ============================================================================
// IN-CELL PICTURES AND MERGES
// ============================================================================

#[test]
fn test_in_cell_picture() {
    let grid = GridBuilder::new(2, 2)
        .all_col_widths(30.0)
        .image("inline", png(8, 8))
        .image_cell("B2", "inline")
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));

    let images = images(&output);
    assert_eq!(images.len(), 1);
    assert_box(&images[0].rect, (0.0, 0.0, 30.0, 15.0));
    // Only B2 carries anything, so it is the whole region.
    assert_eq!(output.region.top_left, CellCoord::new(2, 2));
}

#[test]
fn test_image_inside_merge_moves_to_origin() {
    let grid = GridBuilder::new(3, 3)
        .all_col_widths(20.0)
        .cell("A1", "merged text")
        .image("pic", png(10, 10))
        .anchor("B2:B2", "pic")
        .merge("A1:C3")
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));

    let images = images(&output);
    assert_eq!(images.len(), 1);
    // The image takes over the whole merge, so the merge text is gone.
    assert_box(&images[0].rect, (0.0, 0.0, 60.0, 45.0));
    assert!(texts(&output).is_empty());
}

#[test]
fn test_second_image_on_same_cell_dropped() {
    let grid = GridBuilder::new(1, 1)
        .all_col_widths(40.0)
        .image("one", png(10, 10))
        .image("two", png(20, 20))
        .anchor("A1:A1", "one")
        .image_cell("A1", "two")
        .build();
    let output = layout(&grid, flowing_config(100.0, 100.0));

    let images = images(&output);
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].image_id, "one");
    assert_eq!(decode_failures(&output).len(), 1);
}
