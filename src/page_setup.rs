//! Page setup and layout configuration.
//!
//! All lengths are points (1/72 inch). A [`LayoutConfig`] deserializes from
//! JSON with every field optional, so `{}` is the default configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, XlpageError};
use crate::types::CellRange;

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Page margins in points
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for PageMargins {
    /// Spreadsheet "normal" margins: 0.7in sides, 0.75in top and bottom.
    fn default() -> Self {
        Self::from_inches(0.7, 0.75, 0.7, 0.75)
    }
}

impl PageMargins {
    pub const fn uniform(points: f64) -> Self {
        Self {
            left: points,
            right: points,
            top: points,
            bottom: points,
        }
    }

    /// Build margins from inch values in left, top, right, bottom order.
    pub fn from_inches(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left: left * POINTS_PER_INCH,
            right: right * POINTS_PER_INCH,
            top: top * POINTS_PER_INCH,
            bottom: bottom * POINTS_PER_INCH,
        }
    }
}

/// Page orientation
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Paper size
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum PaperSize {
    #[default]
    Letter,
    Legal,
    Tabloid,
    A3,
    A4,
    A5,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PaperSize {
    /// Map a spreadsheet `paperSize` code (e.g. 1=Letter, 9=A4).
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Letter),
            3 => Some(Self::Tabloid),
            5 => Some(Self::Legal),
            8 => Some(Self::A3),
            9 => Some(Self::A4),
            11 => Some(Self::A5),
            _ => None,
        }
    }

    /// Portrait (width, height) in points.
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Tabloid => (792.0, 1224.0),
            Self::A3 => (841.89, 1190.55),
            Self::A4 => (595.28, 841.89),
            Self::A5 => (419.53, 595.28),
            Self::Custom { width, height } => (width, height),
        }
    }
}

/// Page setup: paper, orientation and margins.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSetup {
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub margins: PageMargins,
}

impl PageSetup {
    /// Page (width, height) after orientation.
    pub fn page_size(&self) -> (f64, f64) {
        let (w, h) = self.paper.dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }

    /// Width left for cells between the side margins.
    pub fn available_width(&self) -> f64 {
        self.page_size().0 - self.margins.left - self.margins.right
    }

    /// Height left for cells between the top and bottom margins.
    pub fn available_height(&self) -> f64 {
        self.page_size().1 - self.margins.top - self.margins.bottom
    }
}

/// How rows are distributed over pages
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PaginationPolicy {
    /// Scale rows so everything fits on one page.
    #[default]
    SinglePageForced,
    /// Keep natural row heights and start new pages as needed.
    Flowing,
}

/// Whether column widths may grow to fill the page
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WidthUpscalePolicy {
    Allow,
    /// Never scale columns above their nominal width.
    #[default]
    ClampToOriginal,
}

/// Default font floor in points.
pub const DEFAULT_FONT_SIZE_FLOOR: f64 = 5.0;
/// Default character count above which text wraps.
pub const DEFAULT_WRAP_LENGTH_THRESHOLD: usize = 40;
/// Points per spreadsheet column width unit.
pub const DEFAULT_WIDTH_UNIT_POINTS: f64 = 6.0;
/// Width, in column units, of a column without an explicit width.
pub const DEFAULT_COLUMN_WIDTH: f64 = 10.0;
/// Height, in points, of a row without an explicit height.
pub const DEFAULT_ROW_HEIGHT: f64 = 15.0;

/// Every knob the layout engine recognizes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Explicit region to render; overrides the grid's print area
    pub addressed_region: Option<CellRange>,
    pub pagination: PaginationPolicy,
    pub width_upscale: WidthUpscalePolicy,
    pub font_size_floor: f64,
    pub wrap_length_threshold: usize,
    pub page: PageSetup,
    pub width_unit_points: f64,
    pub default_column_width: f64,
    pub default_row_height: f64,
    /// Stroke the boundary of the addressed region on each page
    pub outline_region: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            addressed_region: None,
            pagination: PaginationPolicy::default(),
            width_upscale: WidthUpscalePolicy::default(),
            font_size_floor: DEFAULT_FONT_SIZE_FLOOR,
            wrap_length_threshold: DEFAULT_WRAP_LENGTH_THRESHOLD,
            page: PageSetup::default(),
            width_unit_points: DEFAULT_WIDTH_UNIT_POINTS,
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            outline_region: false,
        }
    }
}

impl LayoutConfig {
    /// Parse a configuration from JSON; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that cannot describe a usable page.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        let (w, h) = self.page.page_size();
        if !positive(w) || !positive(h) {
            return Err(XlpageError::Config(format!("page size {w}x{h}")));
        }
        if !positive(self.page.available_width()) || !positive(self.page.available_height()) {
            return Err(XlpageError::Config(
                "margins leave no printable area".to_string(),
            ));
        }
        let m = &self.page.margins;
        if [m.left, m.right, m.top, m.bottom]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(XlpageError::Config("negative margin".to_string()));
        }
        if !positive(self.width_unit_points)
            || !positive(self.default_column_width)
            || !positive(self.default_row_height)
        {
            return Err(XlpageError::Config(
                "width factor and default dimensions must be positive".to_string(),
            ));
        }
        if !self.font_size_floor.is_finite() || self.font_size_floor < 0.0 {
            return Err(XlpageError::Config(format!(
                "font size floor {}",
                self.font_size_floor
            )));
        }
        Ok(())
    }
}
