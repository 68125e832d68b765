use serde::{Deserialize, Serialize};

/// Partial cell style as delivered by the parser.
///
/// Every field is optional; `None` means "inherit". A few fields also have an
/// explicit "off" value that suppresses an inherited default:
/// - `fill: Some("")` draws no fill even if the sheet default has one
/// - a border edge with `style: none` removes that edge
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// ARGB fill color (`"FFRRGGBB"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<AlignmentSpec>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BorderSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderEdge>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BorderEdge {
    #[serde(default)]
    pub style: BorderStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderStyle {
    /// Stroke width in points.
    pub fn width(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Hair => 0.25,
            Self::Thin | Self::Dashed | Self::Dotted | Self::DashDot | Self::DashDotDot => 0.5,
            Self::Medium
            | Self::MediumDashed
            | Self::MediumDashDot
            | Self::MediumDashDotDot
            | Self::SlantDashDot => 1.0,
            Self::Thick | Self::Double => 1.5,
        }
    }

    /// Dash pattern in points (empty = solid).
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            Self::Dashed | Self::MediumDashed => &[3.0, 1.5],
            Self::Dotted | Self::Hair => &[0.75, 0.75],
            Self::DashDot | Self::MediumDashDot | Self::SlantDashDot => &[3.0, 1.0, 0.75, 1.0],
            Self::DashDotDot | Self::MediumDashDotDot => &[3.0, 1.0, 0.75, 1.0, 0.75, 1.0],
            _ => &[],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<HAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<VAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    /// Numbers right, everything else left.
    #[default]
    General,
    Left,
    Center,
    Right,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VAlign {
    Top,
    Center,
    #[default]
    Bottom,
}
