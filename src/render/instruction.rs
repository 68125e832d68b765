//! Draw instructions: the layout's output vocabulary.
//!
//! Every instruction carries its page index and an absolute box in points
//! (origin top-left, y down). Backends consume them in order and never
//! reorder; the engine already emits them back to front.

use serde::Serialize;

use crate::color::Rgb;
use crate::layout::CellBox;
use crate::styles::{FontFamily, FontVariant, ResolvedBorders, TextMode};
use crate::types::{HAlign, ImageFormat, VAlign};

/// Horizontal inset of text from the cell edges, in points.
pub const CELL_PADDING: f64 = 2.0;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawInstruction {
    FillRect(FillRect),
    StrokeRect(StrokeRect),
    DrawImage(DrawImage),
    DrawText(DrawText),
}

impl DrawInstruction {
    pub fn rect(&self) -> &CellBox {
        match self {
            Self::FillRect(i) => &i.rect,
            Self::StrokeRect(i) => &i.rect,
            Self::DrawImage(i) => &i.rect,
            Self::DrawText(i) => &i.rect,
        }
    }

    pub fn page(&self) -> usize {
        self.rect().page
    }

    /// Short name, matching the serialized `op` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FillRect(_) => "fillRect",
            Self::StrokeRect(_) => "strokeRect",
            Self::DrawImage(_) => "drawImage",
            Self::DrawText(_) => "drawText",
        }
    }
}

/// Solid background behind a cell or merge.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FillRect {
    #[serde(flatten)]
    pub rect: CellBox,
    pub color: Rgb,
}

/// Border edges of a cell box; absent edges are not stroked.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrokeRect {
    #[serde(flatten)]
    pub rect: CellBox,
    pub edges: ResolvedBorders,
}

/// Raster image fitted into its span, aspect ratio preserved.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrawImage {
    #[serde(flatten)]
    pub rect: CellBox,
    pub image_id: String,
    pub format: ImageFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl DrawImage {
    /// The largest box with the image's aspect ratio, centered in `rect`.
    pub fn fitted(&self) -> (f64, f64, f64, f64) {
        let r = &self.rect;
        let pw = f64::from(self.pixel_width);
        let ph = f64::from(self.pixel_height);
        if pw <= 0.0 || ph <= 0.0 {
            return (r.x, r.y, r.width, r.height);
        }
        let scale = (r.width / pw).min(r.height / ph);
        let (w, h) = (pw * scale, ph * scale);
        (r.x + (r.width - w) / 2.0, r.y + (r.height - h) / 2.0, w, h)
    }
}

/// Pre-broken text lines for one cell box.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrawText {
    #[serde(flatten)]
    pub rect: CellBox,
    pub lines: Vec<String>,
    /// PostScript name of the base font
    pub font: String,
    pub family: FontFamily,
    pub variant: FontVariant,
    /// Final size in points, scaling and floor applied
    pub size: f64,
    pub color: Rgb,
    /// Never `General`; resolved against the value type
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub mode: TextMode,
    pub line_height: f64,
    pub padding: f64,
}

impl DrawText {
    /// Anchor point of each line: x at the aligned edge (or center) and
    /// the baseline y.
    ///
    /// Lines that would stack past the box still get positions; backends
    /// clip to [`rect`](Self::rect).
    pub fn line_origins(&self) -> Vec<(f64, f64)> {
        let r = &self.rect;
        let x = match self.h_align {
            HAlign::Center => r.x + r.width / 2.0,
            HAlign::Right => r.x + r.width - self.padding,
            HAlign::General | HAlign::Left => r.x + self.padding,
        };
        let count = self.lines.len() as f64;
        let block = count * self.line_height;
        let top = match self.v_align {
            VAlign::Top => r.y,
            VAlign::Center => r.y + (r.height - block) / 2.0,
            VAlign::Bottom => r.y + r.height - block,
        };
        // Baseline sits about 80% down the line box.
        (0..self.lines.len())
            .map(|i| (x, top + (i as f64) * self.line_height + self.line_height * 0.8))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::color::BLACK;

    fn rect() -> CellBox {
        CellBox {
            page: 0,
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 30.0,
        }
    }

    fn text(h_align: HAlign, v_align: VAlign, lines: usize) -> DrawText {
        DrawText {
            rect: rect(),
            lines: vec!["x".to_string(); lines],
            font: "Helvetica".to_string(),
            family: FontFamily::Helvetica,
            variant: FontVariant::Regular,
            size: 10.0,
            color: BLACK,
            h_align,
            v_align,
            mode: TextMode::SingleLine,
            line_height: 10.0,
            padding: CELL_PADDING,
        }
    }

    #[test]
    fn test_line_origins() {
        let origins = text(HAlign::Left, VAlign::Top, 2).line_origins();
        assert_eq!(origins, vec![(12.0, 28.0), (12.0, 38.0)]);

        let origins = text(HAlign::Right, VAlign::Bottom, 1).line_origins();
        assert_eq!(origins, vec![(108.0, 48.0)]);

        let origins = text(HAlign::Center, VAlign::Center, 1).line_origins();
        assert_eq!(origins, vec![(60.0, 38.0)]);
    }

    #[test]
    fn test_image_fit_preserves_aspect() {
        let image = DrawImage {
            rect: rect(),
            image_id: "a".into(),
            format: ImageFormat::Png,
            pixel_width: 20,
            pixel_height: 20,
        };
        assert_eq!(image.fitted(), (45.0, 20.0, 30.0, 30.0));
    }

    #[test]
    fn test_serialized_shape() {
        let fill = DrawInstruction::FillRect(FillRect {
            rect: rect(),
            color: BLACK,
        });
        let json = serde_json::to_value(&fill).unwrap();
        assert_eq!(json["op"], "fillRect");
        assert_eq!(json["page"], 0);
        assert_eq!(json["width"], 100.0);
        assert_eq!(json["color"], "#000000");
        assert_eq!(fill.kind(), "fillRect");
    }
}
