use serde::{Deserialize, Serialize};
use std::fmt;

use super::Style;
use crate::cell_ref::{column_letters, parse_cell_range};

/// 1-based cell coordinate. Orders row-major.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.col), self.row)
    }
}

/// Inclusive rectangle of cells.
///
/// Deserializes from `{"topLeft": .., "bottomRight": ..}` or from an A1 range
/// string such as `"B2:D10"`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", try_from = "RangeRepr")]
pub struct CellRange {
    pub top_left: CellCoord,
    pub bottom_right: CellCoord,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RangeRepr {
    A1(String),
    #[serde(rename_all = "camelCase")]
    Bounds {
        top_left: CellCoord,
        bottom_right: CellCoord,
    },
}

impl TryFrom<RangeRepr> for CellRange {
    type Error = String;

    fn try_from(repr: RangeRepr) -> Result<Self, Self::Error> {
        match repr {
            RangeRepr::A1(s) => parse_cell_range(&s).ok_or_else(|| format!("bad range '{s}'")),
            RangeRepr::Bounds {
                top_left,
                bottom_right,
            } => Ok(Self {
                top_left,
                bottom_right,
            }),
        }
    }
}

impl CellRange {
    pub const fn new(top_left: CellCoord, bottom_right: CellCoord) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Build a range from any two corners.
    pub fn normalized(a: CellCoord, b: CellCoord) -> Self {
        Self {
            top_left: CellCoord::new(a.row.min(b.row), a.col.min(b.col)),
            bottom_right: CellCoord::new(a.row.max(b.row), a.col.max(b.col)),
        }
    }

    pub fn rows(&self) -> u32 {
        self.bottom_right.row.saturating_sub(self.top_left.row) + 1
    }

    pub fn cols(&self) -> u32 {
        self.bottom_right.col.saturating_sub(self.top_left.col) + 1
    }

    /// Number of cells covered.
    pub fn area(&self) -> u64 {
        u64::from(self.rows()) * u64::from(self.cols())
    }

    pub fn contains(&self, at: CellCoord) -> bool {
        at.row >= self.top_left.row
            && at.row <= self.bottom_right.row
            && at.col >= self.top_left.col
            && at.col <= self.bottom_right.col
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.top_left.row <= other.bottom_right.row
            && other.top_left.row <= self.bottom_right.row
            && self.top_left.col <= other.bottom_right.col
            && other.top_left.col <= self.bottom_right.col
    }

    /// Overlap of two ranges, if any.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self {
            top_left: CellCoord::new(
                self.top_left.row.max(other.top_left.row),
                self.top_left.col.max(other.top_left.col),
            ),
            bottom_right: CellCoord::new(
                self.bottom_right.row.min(other.bottom_right.row),
                self.bottom_right.col.min(other.bottom_right.col),
            ),
        })
    }

    /// Clamp both corners into `bounds`.
    ///
    /// Unlike [`intersection`](Self::intersection) this never drops the range:
    /// a range entirely outside `bounds` collapses onto its nearest edge.
    pub fn clamped_to(&self, bounds: &Self) -> Self {
        let clamp = |c: CellCoord| {
            CellCoord::new(
                c.row
                    .clamp(bounds.top_left.row, bounds.bottom_right.row),
                c.col
                    .clamp(bounds.top_left.col, bounds.bottom_right.col),
            )
        };
        Self::normalized(clamp(self.top_left), clamp(self.bottom_right))
    }

    pub fn is_single_cell(&self) -> bool {
        self.top_left == self.bottom_right
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.top_left, self.bottom_right)
    }
}

/// Display value of a cell. Formulas are already reduced by the parser.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Text shown on the page for this value.
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Bool(true) => "TRUE".to_string(),
            Self::Bool(false) => "FALSE".to_string(),
            Self::Number(n) => format_number(*n),
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return "#NUM!".to_string();
    }
    if n.fract().abs() < f64::EPSILON && n.abs() < 1e15 {
        // Integral and small enough to print exactly without an exponent.
        return format!("{n:.0}");
    }
    format!("{n}")
}

/// A single cell of the grid.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub row: u32,
    pub column: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CellValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    /// In-cell picture: id into the grid's image table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl Cell {
    pub fn coord(&self) -> CellCoord {
        CellCoord::new(self.row, self.column)
    }

    /// True if the cell carries a value that renders as visible text.
    pub fn has_text(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_empty())
    }
}

/// A row and its sparse cells.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Row {
    pub index: u32,
    /// Height in points; `None` uses the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default)]
    pub cells: Vec<Cell>,
}

/// Column metadata.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub index: u32,
    /// Width in spreadsheet character units; `None` uses the configured default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// Cells visually merged into the one at `top_left`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MergeRegion {
    pub top_left: CellCoord,
    pub bottom_right: CellCoord,
}

impl MergeRegion {
    pub fn range(&self) -> CellRange {
        CellRange::normalized(self.top_left, self.bottom_right)
    }
}
