//! Utilities for parsing and formatting A1-style cell references and ranges.
//!
//! Everything here is 1-based: `"A1"` is row 1, column 1.

use crate::error::{Result, XlpageError};
use crate::types::{CellCoord, CellRange};

/// Parse a cell reference like `"B3"` (or `"$B$3"`) into a 1-based coordinate.
pub fn parse_cell_ref(cell_ref: &str) -> Option<CellCoord> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for ch in cell_ref.trim().chars() {
        if ch == '$' {
            continue;
        }
        if ch.is_ascii_alphabetic() {
            // Letters after digits ("1A") are not a reference.
            if saw_row {
                return None;
            }
            let upper = ch.to_ascii_uppercase();
            col = col
                .checked_mul(26)?
                .checked_add(upper as u32 - 'A' as u32 + 1)?;
            saw_col = true;
        } else if let Some(digit) = ch.to_digit(10) {
            row = row.checked_mul(10)?.checked_add(digit)?;
            saw_row = true;
        } else {
            return None;
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }

    Some(CellCoord::new(row, col))
}

/// Parse a range like `"A1:B10"` or a single cell `"A1"`.
///
/// The corners are normalized so `top_left` is never below or right of
/// `bottom_right`.
pub fn parse_cell_range(range: &str) -> Option<CellRange> {
    if let Some((start, end)) = range.split_once(':') {
        let a = parse_cell_ref(start)?;
        let b = parse_cell_ref(end)?;
        Some(CellRange::normalized(a, b))
    } else {
        let a = parse_cell_ref(range)?;
        Some(CellRange::new(a, a))
    }
}

/// Like [`parse_cell_range`], but reports what failed to parse.
pub fn parse_region(range: &str) -> Result<CellRange> {
    parse_cell_range(range).ok_or_else(|| XlpageError::CellRef(range.to_string()))
}

/// Convert a 1-based column index to its letters (1 = "A", 28 = "AB").
pub fn column_letters(col: u32) -> String {
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + u8::try_from(rem).unwrap_or(0)));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
