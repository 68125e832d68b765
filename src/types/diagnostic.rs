use serde::{Deserialize, Serialize};

use super::{CellCoord, CellRange};

/// A non-fatal degradation recorded during layout.
///
/// The layout always produces output; these say where it had to guess.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// A merge region or image anchor fell outside the grid and was clamped
    /// or dropped.
    #[serde(rename_all = "camelCase")]
    MalformedGeometry {
        source: GeometrySource,
        original: CellRange,
        /// Range actually used, `None` if the input was dropped
        #[serde(skip_serializing_if = "Option::is_none")]
        resolved: Option<CellRange>,
    },
    /// Characters outside the renderer's glyph set were substituted.
    #[serde(rename_all = "camelCase")]
    UnrenderableGlyph { cell: CellCoord, replaced: usize },
    /// An image payload could not be decoded and was skipped.
    #[serde(rename_all = "camelCase")]
    ResourceDecodeFailure {
        image_id: String,
        anchor: CellCoord,
        reason: String,
    },
    /// A color string could not be parsed; the default was used.
    #[serde(rename_all = "camelCase")]
    InvalidColor {
        #[serde(skip_serializing_if = "Option::is_none")]
        cell: Option<CellCoord>,
        value: String,
    },
    /// Scaling pushed text below the legibility floor; the floor was used.
    #[serde(rename_all = "camelCase")]
    ConfigurationConflict { font_scale: f64, floor: f64 },
    /// An unsplittable block of rows is taller than one page.
    #[serde(rename_all = "camelCase")]
    PageOverflow {
        page: usize,
        first_row: u32,
        last_row: u32,
        height: f64,
        capacity: f64,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum GeometrySource {
    Merge,
    ImageAnchor,
    AddressedRegion,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedGeometry {
                source,
                original,
                resolved: Some(resolved),
            } => write!(f, "{source:?} {original} clamped to {resolved}"),
            Self::MalformedGeometry {
                source, original, ..
            } => write!(f, "{source:?} {original} dropped"),
            Self::UnrenderableGlyph { cell, replaced } => {
                write!(f, "{cell}: {replaced} unrenderable character(s) replaced")
            }
            Self::ResourceDecodeFailure {
                image_id,
                anchor,
                reason,
            } => write!(f, "image '{image_id}' at {anchor} skipped: {reason}"),
            Self::InvalidColor {
                cell: Some(cell),
                value,
            } => write!(f, "{cell}: invalid color '{value}'"),
            Self::InvalidColor { cell: None, value } => {
                write!(f, "sheet default: invalid color '{value}'")
            }
            Self::ConfigurationConflict { font_scale, floor } => write!(
                f,
                "font scale {font_scale:.3} falls under the {floor}pt floor; text may overflow rows"
            ),
            Self::PageOverflow {
                page,
                first_row,
                last_row,
                height,
                capacity,
            } => write!(
                f,
                "rows {first_row}-{last_row} ({height:.1}pt) exceed page {page} capacity ({capacity:.1}pt)"
            ),
        }
    }
}

/// Collects diagnostics and mirrors each one to the `log` facade.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
        self.items.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}
