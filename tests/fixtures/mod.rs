//! Test fixtures for building grid models in memory.
//!
//! This module provides builders for creating `GridModel` values with known
//! contents, so layout tests do not depend on a spreadsheet parser.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{GridBuilder, StyleBuilder};
//!
//! let grid = GridBuilder::new(10, 5)
//!     .cell("A1", "Hello")
//!     .styled_cell("B1", 42.0, StyleBuilder::new().bold().fill("FFFF0000"))
//!     .merge("A2:B3")
//!     .build();
//! ```
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

use std::collections::BTreeMap;

use xlpage::cell_ref::{parse_cell_range, parse_cell_ref};
use xlpage::page_setup::{LayoutConfig, PageMargins, PaginationPolicy, PaperSize};
use xlpage::{
    AlignmentSpec, BorderEdge, BorderSpec, BorderStyle, Cell, CellValue, Column, EmbeddedImage,
    FontSpec, GridModel, HAlign, ImageAnchor, ImageFormat, MergeRegion, Row, Style, VAlign,
};

// ============================================================================
// Style Builder
// ============================================================================

/// Builder for creating cell styles.
#[derive(Debug, Clone, Default)]
pub struct StyleBuilder {
    style: Style,
}

impl StyleBuilder {
    /// Create a new empty style builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn font(&mut self) -> &mut FontSpec {
        self.style.font.get_or_insert_with(FontSpec::default)
    }

    fn alignment(&mut self) -> &mut AlignmentSpec {
        self.style
            .alignment
            .get_or_insert_with(AlignmentSpec::default)
    }

    fn border(&mut self) -> &mut BorderSpec {
        self.style.border.get_or_insert_with(BorderSpec::default)
    }

    /// Set the fill color (ARGB hex).
    #[must_use]
    pub fn fill(mut self, color: &str) -> Self {
        self.style.fill = Some(color.to_string());
        self
    }

    #[must_use]
    pub fn font_name(mut self, name: &str) -> Self {
        self.font().family = Some(name.to_string());
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font().size = Some(size);
        self
    }

    #[must_use]
    pub fn font_color(mut self, color: &str) -> Self {
        self.font().color = Some(color.to_string());
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.font().bold = Some(true);
        self
    }

    #[must_use]
    pub fn italic(mut self) -> Self {
        self.font().italic = Some(true);
        self
    }

    /// Apply the same border to all four edges.
    #[must_use]
    pub fn border_all(mut self, style: BorderStyle, color: Option<&str>) -> Self {
        let edge = BorderEdge {
            style,
            color: color.map(str::to_string),
        };
        let border = self.border();
        border.top = Some(edge.clone());
        border.right = Some(edge.clone());
        border.bottom = Some(edge.clone());
        border.left = Some(edge);
        self
    }

    #[must_use]
    pub fn border_bottom(mut self, style: BorderStyle) -> Self {
        self.border().bottom = Some(BorderEdge { style, color: None });
        self
    }

    #[must_use]
    pub fn align_horizontal(mut self, align: HAlign) -> Self {
        self.alignment().horizontal = Some(align);
        self
    }

    #[must_use]
    pub fn align_vertical(mut self, align: VAlign) -> Self {
        self.alignment().vertical = Some(align);
        self
    }

    #[must_use]
    pub fn wrap_text(mut self) -> Self {
        self.alignment().wrap = Some(true);
        self
    }

    #[must_use]
    pub fn build(self) -> Style {
        self.style
    }
}

// ============================================================================
// Grid Builder
// ============================================================================

/// Builder for a single-sheet grid model.
#[derive(Debug, Clone)]
pub struct GridBuilder {
    grid: GridModel,
    rows: BTreeMap<u32, Row>,
}

impl GridBuilder {
    /// Create an empty grid of the given size.
    #[must_use]
    pub fn new(row_count: u32, column_count: u32) -> Self {
        Self {
            grid: GridModel {
                row_count,
                column_count,
                ..Default::default()
            },
            rows: BTreeMap::new(),
        }
    }

    fn row(&mut self, index: u32) -> &mut Row {
        self.rows.entry(index).or_insert_with(|| Row {
            index,
            height: None,
            cells: Vec::new(),
        })
    }

    fn push_cell(&mut self, cell_ref: &str, cell: impl FnOnce(u32, u32) -> Cell) -> &mut Self {
        let at = parse_cell_ref(cell_ref).expect("bad cell reference");
        let cell = cell(at.row, at.col);
        self.row(at.row).cells.push(cell);
        self
    }

    /// Add a cell with a value.
    #[must_use]
    pub fn cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V) -> Self {
        let value = value.into();
        self.push_cell(cell_ref, |row, column| Cell {
            row,
            column,
            value: Some(value),
            ..Default::default()
        });
        self
    }

    /// Add a cell with a value and a style.
    #[must_use]
    pub fn styled_cell<V: Into<CellValue>>(
        mut self,
        cell_ref: &str,
        value: V,
        style: StyleBuilder,
    ) -> Self {
        let value = value.into();
        self.push_cell(cell_ref, |row, column| Cell {
            row,
            column,
            value: Some(value),
            style: Some(style.build()),
            image_ref: None,
        });
        self
    }

    /// Add a styled cell without a value.
    #[must_use]
    pub fn style_only(mut self, cell_ref: &str, style: StyleBuilder) -> Self {
        self.push_cell(cell_ref, |row, column| Cell {
            row,
            column,
            style: Some(style.build()),
            ..Default::default()
        });
        self
    }

    /// Add a cell holding an in-cell picture.
    #[must_use]
    pub fn image_cell(mut self, cell_ref: &str, image_id: &str) -> Self {
        self.push_cell(cell_ref, |row, column| Cell {
            row,
            column,
            image_ref: Some(image_id.to_string()),
            ..Default::default()
        });
        self
    }

    /// Add a merge region such as `"A1:B2"`.
    #[must_use]
    pub fn merge(mut self, range: &str) -> Self {
        let range = parse_cell_range(range).expect("bad merge range");
        self.grid.merges.push(MergeRegion {
            top_left: range.top_left,
            bottom_right: range.bottom_right,
        });
        self
    }

    /// Set the width (in column units) of one column.
    #[must_use]
    pub fn col_width(mut self, col: u32, width: f64) -> Self {
        self.grid.columns.push(Column {
            index: col,
            width: Some(width),
        });
        self
    }

    /// Set the width of every column in the grid.
    #[must_use]
    pub fn all_col_widths(mut self, width: f64) -> Self {
        for col in 1..=self.grid.column_count {
            self = self.col_width(col, width);
        }
        self
    }

    /// Set the height (points) of one row.
    #[must_use]
    pub fn row_height(mut self, row: u32, height: f64) -> Self {
        self.row(row).height = Some(height);
        self
    }

    /// Set the height of every row in the grid.
    #[must_use]
    pub fn all_row_heights(mut self, height: f64) -> Self {
        for row in 1..=self.grid.row_count {
            self = self.row_height(row, height);
        }
        self
    }

    /// Register an image payload.
    #[must_use]
    pub fn image(mut self, id: &str, data: Vec<u8>) -> Self {
        self.grid.images.push(EmbeddedImage {
            id: id.to_string(),
            format: Some(ImageFormat::from_magic_bytes(&data)),
            data,
        });
        self
    }

    /// Anchor an image over a range such as `"B5:C6"`.
    #[must_use]
    pub fn anchor(mut self, range: &str, image_id: &str) -> Self {
        let range = parse_cell_range(range).expect("bad anchor range");
        self.grid.image_anchors.push(ImageAnchor {
            top_left: range.top_left,
            bottom_right: range.bottom_right,
            image_id: image_id.to_string(),
        });
        self
    }

    #[must_use]
    pub fn print_area(mut self, range: &str) -> Self {
        self.grid.print_area = Some(parse_cell_range(range).expect("bad print area"));
        self
    }

    #[must_use]
    pub fn default_style(mut self, style: StyleBuilder) -> Self {
        self.grid.default_style = Some(style.build());
        self
    }

    #[must_use]
    pub fn build(mut self) -> GridModel {
        self.grid.rows = self.rows.into_values().collect();
        self.grid
    }
}

// ============================================================================
// Payloads and configuration
// ============================================================================

/// A real, decodable PNG of the given pixel size.
#[must_use]
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::new();
    image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height))
        .write_to(&mut std::io::Cursor::new(&mut data), image::ImageFormat::Png)
        .expect("encode png");
    data
}

/// A PNG whose signature and `IHDR` are intact but whose image data is not.
#[must_use]
pub fn corrupt_png(width: u32, height: u32) -> Vec<u8> {
    let mut data = png(width, height);
    data.truncate(33);
    data.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01, 0x02, 0x03]);
    data
}

/// A page of exactly `width` x `height` points with no margins, where one
/// column width unit is one point.
#[must_use]
pub fn unit_config(width: f64, height: f64) -> LayoutConfig {
    let mut config = LayoutConfig {
        width_unit_points: 1.0,
        ..Default::default()
    };
    config.page.paper = PaperSize::Custom { width, height };
    config.page.margins = PageMargins::uniform(0.0);
    config
}

/// Like [`unit_config`] but with flowing pagination.
#[must_use]
pub fn flowing_config(width: f64, height: f64) -> LayoutConfig {
    LayoutConfig {
        pagination: PaginationPolicy::Flowing,
        ..unit_config(width, height)
    }
}
