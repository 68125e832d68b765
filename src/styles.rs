//! Effective style resolution.
//!
//! A cell's style is assembled field by field: the cell's own value wins,
//! then the sheet default, then the built-in default below. Resolution is a
//! pure function of its inputs.

use serde::Serialize;

use crate::color::{parse_argb, parse_fill, FillColor, Rgb, BLACK};
use crate::types::{BorderEdge, BorderSpec, BorderStyle, CellValue, HAlign, Style, VAlign};

/// Built-in font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 9.0;

/// The three standard font families the renderer is guaranteed to have.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FontFamily {
    #[default]
    Helvetica,
    Times,
    Courier,
}

impl FontFamily {
    /// Substitute a requested family name onto a standard family.
    ///
    /// Unknown names fall back to Helvetica.
    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        let serif = [
            "times", "times new roman", "times-roman", "cambria", "georgia", "garamond",
            "book antiqua", "palatino", "palatino linotype", "serif",
        ];
        let mono = [
            "courier", "courier new", "consolas", "lucida console", "monaco", "menlo",
            "monospace",
        ];
        if serif.contains(&lower.as_str()) {
            Self::Times
        } else if mono.contains(&lower.as_str()) {
            Self::Courier
        } else {
            Self::Helvetica
        }
    }
}

/// One of the four supported weight/slant combinations.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FontVariant {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => Self::BoldItalic,
            (true, false) => Self::Bold,
            (false, true) => Self::Italic,
            (false, false) => Self::Regular,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Self::Italic | Self::BoldItalic)
    }
}

/// PostScript name of a base font, e.g. `Helvetica-BoldOblique`.
pub fn postscript_name(family: FontFamily, variant: FontVariant) -> &'static str {
    match (family, variant) {
        (FontFamily::Helvetica, FontVariant::Regular) => "Helvetica",
        (FontFamily::Helvetica, FontVariant::Bold) => "Helvetica-Bold",
        (FontFamily::Helvetica, FontVariant::Italic) => "Helvetica-Oblique",
        (FontFamily::Helvetica, FontVariant::BoldItalic) => "Helvetica-BoldOblique",
        (FontFamily::Times, FontVariant::Regular) => "Times-Roman",
        (FontFamily::Times, FontVariant::Bold) => "Times-Bold",
        (FontFamily::Times, FontVariant::Italic) => "Times-Italic",
        (FontFamily::Times, FontVariant::BoldItalic) => "Times-BoldItalic",
        (FontFamily::Courier, FontVariant::Regular) => "Courier",
        (FontFamily::Courier, FontVariant::Bold) => "Courier-Bold",
        (FontFamily::Courier, FontVariant::Italic) => "Courier-Oblique",
        (FontFamily::Courier, FontVariant::BoldItalic) => "Courier-BoldOblique",
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFont {
    pub family: FontFamily,
    pub variant: FontVariant,
    /// Unscaled size in points
    pub size: f64,
    pub color: Rgb,
}

impl Default for ResolvedFont {
    fn default() -> Self {
        Self {
            family: FontFamily::Helvetica,
            variant: FontVariant::Regular,
            size: DEFAULT_FONT_SIZE,
            color: BLACK,
        }
    }
}

/// A border edge that will be stroked.
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStroke {
    pub style: BorderStyle,
    pub width: f64,
    pub color: Rgb,
}

#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBorders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<EdgeStroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<EdgeStroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<EdgeStroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<EdgeStroke>,
}

impl ResolvedBorders {
    /// True if at least one edge is stroked.
    pub fn any(&self) -> bool {
        self.top.is_some() || self.right.is_some() || self.bottom.is_some() || self.left.is_some()
    }

    /// The same stroke on all four edges.
    pub fn outline(stroke: EdgeStroke) -> Self {
        Self {
            top: Some(stroke),
            right: Some(stroke),
            bottom: Some(stroke),
            left: Some(stroke),
        }
    }
}

/// Fully resolved visual style of one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectiveStyle {
    /// `None` means nothing is painted behind the cell.
    pub fill: Option<Rgb>,
    pub font: ResolvedFont,
    pub borders: ResolvedBorders,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub wrap: bool,
}

impl EffectiveStyle {
    /// The built-in default: Helvetica 9pt black, no fill, no borders.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Concrete horizontal alignment for a value; `General` puts numbers
    /// on the right and everything else on the left.
    pub fn horizontal_for(&self, value: Option<&CellValue>) -> HAlign {
        match self.h_align {
            HAlign::General if value.is_some_and(CellValue::is_number) => HAlign::Right,
            HAlign::General => HAlign::Left,
            other => other,
        }
    }
}

/// How a cell's text deals with running out of horizontal room.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TextMode {
    /// One line, truncated with an ellipsis.
    SingleLine,
    /// Multi-line, word wrapped inside the box.
    Wrap,
}

/// Pick the overflow policy for a cell.
///
/// Merged cells and long values always wrap; short unmerged values only wrap
/// when their style asks for it.
pub fn text_mode(style: &EffectiveStyle, merged: bool, char_len: usize, threshold: usize) -> TextMode {
    if merged || char_len > threshold || style.wrap {
        TextMode::Wrap
    } else {
        TextMode::SingleLine
    }
}

/// Scale a font size, never going under `floor`.
///
/// Returns the size and whether the floor kicked in.
pub fn scaled_font_size(size: f64, scale: f64, floor: f64) -> (f64, bool) {
    let scaled = size * scale;
    if scaled < floor {
        (floor, true)
    } else {
        (scaled, false)
    }
}

/// Resolves cell styles against a sheet default.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleResolver<'a> {
    sheet_default: Option<&'a Style>,
}

impl<'a> StyleResolver<'a> {
    pub fn new(sheet_default: Option<&'a Style>) -> Self {
        Self { sheet_default }
    }

    /// Resolve a cell's effective style. `None` means an unstyled cell.
    pub fn resolve(&self, cell_style: Option<&Style>) -> EffectiveStyle {
        let layers = [cell_style, self.sheet_default];
        let builtin = EffectiveStyle::builtin();

        let fill = first_set(&layers, |s| s.fill.as_deref())
            .and_then(|code| match parse_fill(code) {
                FillColor::Solid(rgb) => Some(rgb),
                FillColor::NoFill | FillColor::Invalid => None,
            });

        let font_layers = layers.map(|s| s.and_then(|s| s.font.as_ref()));
        let family = font_layers
            .iter()
            .flatten()
            .find_map(|f| f.family.as_deref())
            .map_or(builtin.font.family, FontFamily::from_name);
        let size = font_layers
            .iter()
            .flatten()
            .find_map(|f| f.size.filter(|s| s.is_finite() && *s > 0.0))
            .unwrap_or(builtin.font.size);
        let bold = font_layers.iter().flatten().find_map(|f| f.bold).unwrap_or(false);
        let italic = font_layers
            .iter()
            .flatten()
            .find_map(|f| f.italic)
            .unwrap_or(false);
        let color = font_layers
            .iter()
            .flatten()
            .find_map(|f| f.color.as_deref())
            .and_then(parse_argb)
            .unwrap_or(builtin.font.color);

        let edge = |get: fn(&BorderSpec) -> Option<&BorderEdge>| {
            layers
                .iter()
                .flatten()
                .filter_map(|s| s.border.as_ref())
                .find_map(get)
                .and_then(resolve_edge)
        };
        let borders = ResolvedBorders {
            top: edge(|b| b.top.as_ref()),
            right: edge(|b| b.right.as_ref()),
            bottom: edge(|b| b.bottom.as_ref()),
            left: edge(|b| b.left.as_ref()),
        };

        let alignment_layers = layers.map(|s| s.and_then(|s| s.alignment.as_ref()));
        let h_align = alignment_layers
            .iter()
            .flatten()
            .find_map(|a| a.horizontal)
            .unwrap_or(builtin.h_align);
        let v_align = alignment_layers
            .iter()
            .flatten()
            .find_map(|a| a.vertical)
            .unwrap_or(builtin.v_align);
        let wrap = alignment_layers
            .iter()
            .flatten()
            .find_map(|a| a.wrap)
            .unwrap_or(builtin.wrap);

        EffectiveStyle {
            fill,
            font: ResolvedFont {
                family,
                variant: FontVariant::from_flags(bold, italic),
                size,
                color,
            },
            borders,
            h_align,
            v_align,
            wrap,
        }
    }

    /// Color codes in `style` that cannot be parsed.
    ///
    /// Kept separate from [`resolve`](Self::resolve) so resolution stays pure;
    /// the engine turns these into diagnostics.
    pub fn invalid_colors(style: &Style) -> Vec<String> {
        let mut bad = Vec::new();
        if let Some(fill) = &style.fill {
            if parse_fill(fill) == FillColor::Invalid {
                bad.push(fill.clone());
            }
        }
        if let Some(color) = style.font.as_ref().and_then(|f| f.color.as_ref()) {
            if parse_argb(color).is_none() {
                bad.push(color.clone());
            }
        }
        if let Some(border) = &style.border {
            for edge in [&border.top, &border.right, &border.bottom, &border.left]
                .into_iter()
                .flatten()
            {
                if let Some(color) = &edge.color {
                    if parse_argb(color).is_none() {
                        bad.push(color.clone());
                    }
                }
            }
        }
        bad
    }
}

fn first_set<'s, T: ?Sized>(
    layers: &[Option<&'s Style>; 2],
    get: impl Fn(&'s Style) -> Option<&'s T>,
) -> Option<&'s T> {
    layers.iter().flatten().find_map(|s| get(*s))
}

fn resolve_edge(edge: &BorderEdge) -> Option<EdgeStroke> {
    if edge.style == BorderStyle::None {
        return None;
    }
    let color = edge
        .color
        .as_deref()
        .and_then(parse_argb)
        .unwrap_or(BLACK);
    Some(EdgeStroke {
        style: edge.style,
        width: edge.style.width(),
        color,
    })
}
