//! The layout engine: grid in, page instructions out.
//!
//! A render runs the stages in a fixed order: region, merges, images,
//! geometry and pagination, then emission. Each stage reads the previous
//! ones and nothing is mutated afterwards, so identical inputs give
//! identical instruction lists.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::BLACK;
use crate::drawings::{ImageAnchorMapper, ImagePlacement};
use crate::error::Result;
use crate::layout::{resolve_region, CellBox, GeometryResolver, MergeIndex, PageGeometry};
use crate::page_setup::LayoutConfig;
use crate::render::{
    DrawImage, DrawInstruction, DrawText, FillRect, StrokeRect, CELL_PADDING,
};
use crate::styles::{
    postscript_name, scaled_font_size, text_mode, EdgeStroke, EffectiveStyle, ResolvedBorders,
    StyleResolver, TextMode,
};
use crate::text::{sanitize, truncate_text, wrap_text, FontMetrics};
use crate::types::{
    BorderStyle, Cell, CellCoord, CellRange, Diagnostic, Diagnostics, GridModel,
};

/// Result of one render.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutput {
    pub page_width: f64,
    pub page_height: f64,
    pub page_count: usize,
    pub scale_x: f64,
    pub scale_y: f64,
    pub font_scale: f64,
    /// The region that was laid out
    pub region: CellRange,
    /// Grouped by page, back to front within a page
    pub instructions: Vec<DrawInstruction>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LayoutOutput {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Instructions of one page in emission order.
    pub fn page_instructions(&self, page: usize) -> impl Iterator<Item = &DrawInstruction> {
        self.instructions.iter().filter(move |i| i.page() == page)
    }
}

/// Instructions of one page, split by paint layer.
#[derive(Debug, Default)]
struct PageLayers {
    fills: Vec<DrawInstruction>,
    strokes: Vec<DrawInstruction>,
    images: Vec<DrawInstruction>,
    texts: Vec<DrawInstruction>,
}

/// Lays a grid out onto pages.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `grid`.
    ///
    /// Each page is emitted in four layers, each row-major: every fill, then
    /// every stroke (and the region outline), then every image, then every
    /// text. Instructions of different cells are not interleaved; within one
    /// cell the order is fill, stroke, image, text.
    ///
    /// Fails only on structurally invalid grids or unusable configuration.
    /// Everything else degrades and is reported in
    /// [`LayoutOutput::diagnostics`].
    pub fn render(&self, grid: &GridModel) -> Result<LayoutOutput> {
        self.config.validate()?;
        grid.validate()?;

        let mut diagnostics = Diagnostics::new();
        let region = resolve_region(grid, &self.config, &mut diagnostics);
        let merges = MergeIndex::build(
            &grid.merges,
            grid.bounds().as_ref(),
            &region,
            &mut diagnostics,
        );
        let images = ImageAnchorMapper::new(grid, &merges, region).map(&mut diagnostics);

        let keep_together: Vec<(u32, u32)> = merges
            .regions()
            .iter()
            .chain(images.values().map(|p| &p.span))
            .filter(|r| r.rows() > 1)
            .map(|r| (r.top_left.row, r.bottom_right.row))
            .collect();
        let geometry = GeometryResolver::new(&self.config).resolve(grid, &region, &keep_together);

        for overflow in &geometry.overflows {
            let absolute = |i: usize| {
                u32::try_from(i).map_or(u32::MAX, |i| region.top_left.row.saturating_add(i))
            };
            diagnostics.push(Diagnostic::PageOverflow {
                page: overflow.page,
                first_row: absolute(overflow.block.first),
                last_row: absolute(overflow.block.last),
                height: overflow.height,
                capacity: self.config.page.available_height(),
            });
        }

        if let Some(default_style) = &grid.default_style {
            for value in StyleResolver::invalid_colors(default_style) {
                diagnostics.push(Diagnostic::InvalidColor { cell: None, value });
            }
        }

        let emitter = Emitter {
            config: &self.config,
            geometry: &geometry,
            merges: &merges,
            images: &images,
            resolver: StyleResolver::new(grid.default_style.as_ref()),
            cells: index_cells(grid, &region),
        };
        let instructions = emitter.emit(&mut diagnostics);

        log::debug!(
            "layout {region}: {} instruction(s) on {} page(s), {} diagnostic(s)",
            instructions.len(),
            geometry.page_count,
            diagnostics.len()
        );

        let (page_width, page_height) = self.config.page.page_size();
        Ok(LayoutOutput {
            page_width,
            page_height,
            page_count: geometry.page_count,
            scale_x: geometry.scale_x,
            scale_y: geometry.scale_y,
            font_scale: geometry.font_scale,
            region,
            instructions,
            diagnostics: diagnostics.into_vec(),
        })
    }
}

/// Cells inside `region` by coordinate. A duplicate coordinate keeps the
/// first cell.
fn index_cells<'g>(grid: &'g GridModel, region: &CellRange) -> BTreeMap<CellCoord, &'g Cell> {
    let mut cells = BTreeMap::new();
    for cell in grid.rows.iter().flat_map(|row| &row.cells) {
        let at = cell.coord();
        if region.contains(at) {
            cells.entry(at).or_insert(cell);
        }
    }
    cells
}

/// Read-only view of a resolved layout that produces instructions.
struct Emitter<'a> {
    config: &'a LayoutConfig,
    geometry: &'a PageGeometry,
    merges: &'a MergeIndex,
    images: &'a BTreeMap<CellCoord, ImagePlacement<'a>>,
    resolver: StyleResolver<'a>,
    cells: BTreeMap<CellCoord, &'a Cell>,
}

impl Emitter<'_> {
    fn emit(&self, diagnostics: &mut Diagnostics) -> Vec<DrawInstruction> {
        let mut pages: Vec<PageLayers> = (0..self.geometry.page_count)
            .map(|_| PageLayers::default())
            .collect();
        let region = self.geometry.region;
        let mut floor_hit = false;

        for row in region.top_left.row..=region.bottom_right.row {
            for col in region.top_left.col..=region.bottom_right.col {
                let at = CellCoord::new(row, col);
                let merge = self.merges.get(at);
                if merge.is_some_and(|m| !m.is_origin) {
                    continue;
                }
                let span = merge.map_or(CellRange::new(at, at), |m| m.range);
                let Some(rect) = self.geometry.span_box(&span).filter(|r| !r.is_empty()) else {
                    continue;
                };
                let Some(layers) = pages.get_mut(rect.page) else {
                    continue;
                };

                let cell = self.cells.get(&at).copied();
                let cell_style = cell.and_then(|c| c.style.as_ref());
                if let Some(style) = cell_style {
                    for value in StyleResolver::invalid_colors(style) {
                        diagnostics.push(Diagnostic::InvalidColor {
                            cell: Some(at),
                            value,
                        });
                    }
                }
                let style = self.resolver.resolve(cell_style);

                if let Some(color) = style.fill {
                    layers
                        .fills
                        .push(DrawInstruction::FillRect(FillRect { rect, color }));
                }
                if style.borders.any() {
                    layers.strokes.push(DrawInstruction::StrokeRect(StrokeRect {
                        rect,
                        edges: style.borders,
                    }));
                }
                if self.images.contains_key(&at) {
                    continue;
                }
                let merged = merge.is_some();
                if let Some(text) =
                    cell.and_then(|c| self.text(c, rect, &style, merged, diagnostics, &mut floor_hit))
                {
                    layers.texts.push(DrawInstruction::DrawText(text));
                }
            }
        }

        if self.config.outline_region {
            self.outline(&mut pages);
        }

        for placement in self.images.values() {
            let Some(rect) = self.geometry.span_box(&placement.span).filter(|r| !r.is_empty())
            else {
                continue;
            };
            if let Some(layers) = pages.get_mut(rect.page) {
                layers.images.push(DrawInstruction::DrawImage(DrawImage {
                    rect,
                    image_id: placement.image.id.clone(),
                    format: placement.info.format,
                    pixel_width: placement.info.width,
                    pixel_height: placement.info.height,
                }));
            }
        }

        if floor_hit {
            diagnostics.push(Diagnostic::ConfigurationConflict {
                font_scale: self.geometry.font_scale,
                floor: self.config.font_size_floor,
            });
        }

        pages
            .into_iter()
            .flat_map(|p| {
                p.fills
                    .into_iter()
                    .chain(p.strokes)
                    .chain(p.images)
                    .chain(p.texts)
            })
            .collect()
    }

    fn text(
        &self,
        cell: &Cell,
        rect: CellBox,
        style: &EffectiveStyle,
        merged: bool,
        diagnostics: &mut Diagnostics,
        floor_hit: &mut bool,
    ) -> Option<DrawText> {
        let value = cell.value.as_ref()?;
        let (text, replaced) = sanitize(&value.display());
        if replaced > 0 {
            diagnostics.push(Diagnostic::UnrenderableGlyph {
                cell: cell.coord(),
                replaced,
            });
        }
        if text.trim().is_empty() {
            return None;
        }

        let font = style.font;
        let (size, floored) =
            scaled_font_size(font.size, self.geometry.font_scale, self.config.font_size_floor);
        *floor_hit |= floored;
        let metrics = FontMetrics {
            family: font.family,
            variant: font.variant,
            size,
        };

        let inner_width = rect.width - 2.0 * CELL_PADDING;
        if inner_width <= 0.0 {
            return None;
        }
        let mode = text_mode(
            style,
            merged,
            text.chars().count(),
            self.config.wrap_length_threshold,
        );
        let lines = match mode {
            TextMode::Wrap => wrap_text(&text, inner_width, &metrics),
            TextMode::SingleLine => {
                let single = text.replace('\n', " ");
                vec![truncate_text(&single, inner_width, &metrics)]
            }
        };

        Some(DrawText {
            rect,
            lines,
            font: postscript_name(font.family, font.variant).to_string(),
            family: font.family,
            variant: font.variant,
            size,
            color: font.color,
            h_align: style.horizontal_for(Some(value)),
            v_align: style.v_align,
            mode,
            line_height: metrics.line_height(),
            padding: CELL_PADDING,
        })
    }

    /// Stroke the part of the region that landed on each page.
    fn outline(&self, pages: &mut [PageLayers]) {
        let geometry = self.geometry;
        let region = geometry.region;
        let stroke = EdgeStroke {
            style: BorderStyle::Thin,
            width: BorderStyle::Thin.width(),
            color: BLACK,
        };
        for (page, layers) in pages.iter_mut().enumerate() {
            let mut rows = geometry.rows_on_page(page);
            let Some(first) = rows.next() else {
                continue;
            };
            let last = rows.last().unwrap_or(first);
            let span = CellRange::new(
                CellCoord::new(first, region.top_left.col),
                CellCoord::new(last, region.bottom_right.col),
            );
            if let Some(rect) = geometry.span_box(&span).filter(|r| !r.is_empty()) {
                layers.strokes.push(DrawInstruction::StrokeRect(StrokeRect {
                    rect,
                    edges: ResolvedBorders::outline(stroke),
                }));
            }
        }
    }
}
