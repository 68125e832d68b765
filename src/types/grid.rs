use serde::{Deserialize, Serialize};

use super::{CellCoord, CellRange, Column, EmbeddedImage, ImageAnchor, MergeRegion, Row, Style};
use crate::error::{Result, XlpageError};

/// The full input: one parsed worksheet, read-only to the layout engine.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GridModel {
    pub row_count: u32,
    pub column_count: u32,
    /// Explicit print region defined in the workbook
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_area: Option<CellRange>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub merges: Vec<MergeRegion>,
    #[serde(default)]
    pub images: Vec<EmbeddedImage>,
    #[serde(default)]
    pub image_anchors: Vec<ImageAnchor>,
    /// Sheet-level default style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_style: Option<Style>,
}

impl GridModel {
    /// Parse a grid from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The whole sheet as a range, or `None` for a zero-sized grid.
    pub fn bounds(&self) -> Option<CellRange> {
        if self.row_count == 0 || self.column_count == 0 {
            return None;
        }
        Some(CellRange::new(
            CellCoord::new(1, 1),
            CellCoord::new(self.row_count, self.column_count),
        ))
    }

    pub fn image(&self, id: &str) -> Option<&EmbeddedImage> {
        self.images.iter().find(|img| img.id == id)
    }

    /// Check the structural preconditions the layout relies on.
    ///
    /// Coordinates are 1-based, so a zero anywhere means the parser lost the
    /// coordinate. Out-of-bounds coordinates are not errors; they are clamped
    /// during layout.
    pub fn validate(&self) -> Result<()> {
        for column in &self.columns {
            if column.index == 0 {
                return Err(XlpageError::InvalidGrid(
                    "column with index 0".to_string(),
                ));
            }
        }
        for row in &self.rows {
            if row.index == 0 {
                return Err(XlpageError::InvalidGrid("row with index 0".to_string()));
            }
            for cell in &row.cells {
                if cell.column == 0 {
                    return Err(XlpageError::InvalidGrid(format!(
                        "cell in row {} has column 0",
                        row.index
                    )));
                }
                if cell.row != row.index {
                    return Err(XlpageError::InvalidGrid(format!(
                        "cell claims row {} but is stored in row {}",
                        cell.row, row.index
                    )));
                }
            }
        }
        for merge in &self.merges {
            check_coord(merge.top_left, "merge region")?;
            check_coord(merge.bottom_right, "merge region")?;
        }
        for anchor in &self.image_anchors {
            check_coord(anchor.top_left, "image anchor")?;
            check_coord(anchor.bottom_right, "image anchor")?;
        }
        if let Some(area) = &self.print_area {
            check_coord(area.top_left, "print area")?;
            check_coord(area.bottom_right, "print area")?;
        }
        Ok(())
    }
}

fn check_coord(at: CellCoord, what: &str) -> Result<()> {
    if at.row == 0 || at.col == 0 {
        return Err(XlpageError::InvalidGrid(format!(
            "{what} has a zero coordinate ({}, {})",
            at.row, at.col
        )));
    }
    Ok(())
}
