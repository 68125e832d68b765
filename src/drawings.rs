//! Image placement.
//!
//! Images arrive two ways: two-cell anchors in the grid's anchor list, and
//! in-cell pictures referenced from a cell's `imageRef`. Both are mapped onto
//! a single key cell per image so the renderer draws each one exactly once.
//!
//! # Payloads
//!
//! Every payload is fully decoded with the `image` crate before it is placed,
//! so a valid header over a corrupt body is caught here rather than in a
//! backend. Vector (EMF/WMF), unknown and undecodable payloads are skipped
//! with a diagnostic and the key cell keeps its text.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::layout::MergeIndex;
use crate::types::{
    CellCoord, CellRange, Diagnostic, Diagnostics, EmbeddedImage, GeometrySource, GridModel,
    ImageFormat,
};

/// Facts about a decoded raster payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageDecodeError {
    #[error("empty payload")]
    Empty,
    #[error("unrecognized image format")]
    UnknownFormat,
    #[error("{0:?} images are not supported")]
    Unsupported(ImageFormat),
    #[error("corrupt {format:?} image: {message}")]
    Corrupt {
        format: ImageFormat,
        message: String,
    },
}

/// Sniff the format of `data`, decode it and report its pixel dimensions.
pub fn decode_image(data: &[u8]) -> Result<ImageInfo, ImageDecodeError> {
    if data.is_empty() {
        return Err(ImageDecodeError::Empty);
    }
    let sniffed = ImageFormat::from_magic_bytes(data);
    if matches!(sniffed, ImageFormat::Emf | ImageFormat::Wmf) {
        return Err(ImageDecodeError::Unsupported(sniffed));
    }

    let raster = image::guess_format(data).map_err(|_| ImageDecodeError::UnknownFormat)?;
    let format = raster
        .extensions_str()
        .first()
        .map_or(ImageFormat::Unknown, |ext| ImageFormat::from_extension(ext));
    if format == ImageFormat::Unknown {
        return Err(ImageDecodeError::Unsupported(sniffed));
    }

    let decoded = image::load_from_memory_with_format(data, raster).map_err(|err| {
        ImageDecodeError::Corrupt {
            format,
            message: err.to_string(),
        }
    })?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(ImageDecodeError::Corrupt {
            format,
            message: "zero-sized image".to_string(),
        });
    }
    Ok(ImageInfo {
        format,
        width,
        height,
    })
}

/// An image resolved onto the page grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement<'a> {
    /// Cell the image renders under; its text is suppressed
    pub key: CellCoord,
    /// Cells covered by the drawn image box
    pub span: CellRange,
    pub image: &'a EmbeddedImage,
    pub info: ImageInfo,
}

/// Maps image anchors onto key cells of the addressed region.
#[derive(Debug, Clone, Copy)]
pub struct ImageAnchorMapper<'a, 'm> {
    grid: &'a GridModel,
    merges: &'m MergeIndex,
    region: CellRange,
}

impl<'a, 'm> ImageAnchorMapper<'a, 'm> {
    pub fn new(grid: &'a GridModel, merges: &'m MergeIndex, region: CellRange) -> Self {
        Self {
            grid,
            merges,
            region,
        }
    }

    /// Resolve every anchor into at most one placement per key cell.
    ///
    /// Anchor-list entries come first, then in-cell pictures in row order.
    pub fn map(&self, diagnostics: &mut Diagnostics) -> BTreeMap<CellCoord, ImagePlacement<'a>> {
        let anchors = self.grid.image_anchors.iter().map(|a| {
            (
                CellRange::normalized(a.top_left, a.bottom_right),
                a.image_id.as_str(),
            )
        });
        let in_cell = self
            .grid
            .rows
            .iter()
            .flat_map(|row| &row.cells)
            .filter_map(|cell| {
                let id = cell.image_ref.as_deref()?;
                let at = cell.coord();
                Some((CellRange::new(at, at), id))
            });

        let mut placements = BTreeMap::new();
        for (span, image_id) in anchors.chain(in_cell) {
            if let Some(placement) = self.place(span, image_id, diagnostics) {
                if placements.contains_key(&placement.key) {
                    diagnostics.push(Diagnostic::ResourceDecodeFailure {
                        image_id: image_id.to_string(),
                        anchor: placement.key,
                        reason: "another image already occupies this cell".to_string(),
                    });
                    continue;
                }
                placements.insert(placement.key, placement);
            }
        }
        placements
    }

    fn place(
        &self,
        original: CellRange,
        image_id: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<ImagePlacement<'a>> {
        let bounds = self.grid.bounds()?;
        let in_grid = original.clamped_to(&bounds);
        if in_grid != original {
            diagnostics.push(Diagnostic::MalformedGeometry {
                source: GeometrySource::ImageAnchor,
                original,
                resolved: Some(in_grid),
            });
        }

        if !self.region.contains(in_grid.top_left) {
            log::debug!("image '{image_id}' at {} is outside the region", in_grid.top_left);
            return None;
        }
        let span = in_grid.intersection(&self.region)?;

        let Some(image) = self.grid.image(image_id) else {
            diagnostics.push(Diagnostic::ResourceDecodeFailure {
                image_id: image_id.to_string(),
                anchor: span.top_left,
                reason: "no image with this id".to_string(),
            });
            return None;
        };
        let info = match decode_image(&image.data) {
            Ok(info) => info,
            Err(err) => {
                diagnostics.push(Diagnostic::ResourceDecodeFailure {
                    image_id: image_id.to_string(),
                    anchor: span.top_left,
                    reason: err.to_string(),
                });
                return None;
            }
        };
        if image.format.is_some_and(|tag| tag != info.format) {
            log::debug!(
                "image '{image_id}' tagged {:?} but sniffed as {:?}",
                image.format,
                info.format
            );
        }

        // An image starting inside a merge belongs to the merge origin; the
        // larger of the two areas sets the box.
        let (key, span) = match self.merges.get(span.top_left) {
            Some(merge) if span.area() > merge.range.area() => (merge.range.top_left, span),
            Some(merge) => (merge.range.top_left, merge.range),
            None => (span.top_left, span),
        };

        Some(ImagePlacement {
            key,
            span,
            image,
            info,
        })
    }
}
