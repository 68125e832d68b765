//! Text measurement, glyph fallback and line breaking.
//!
//! The target renderer draws with the standard PDF base fonts, which only
//! cover the WinAnsi character set. Measurement uses built-in Helvetica
//! advance widths so layout stays deterministic without a font backend.

use crate::styles::{FontFamily, FontVariant};

/// Character used in place of glyphs the renderer cannot draw.
pub const REPLACEMENT_CHAR: char = '?';

/// Ellipsis appended to truncated single-line text.
pub const ELLIPSIS: &str = "\u{2026}";

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Helvetica advance widths (1/1000 em) for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {..~
];

/// Width used for non-ASCII characters in the WinAnsi range.
const DEFAULT_ADVANCE: u16 = 556;

/// Characters outside Latin-1 that WinAnsi still encodes.
const WINANSI_EXTRAS: &[char] = &[
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

/// Whether the base fonts can draw `ch`.
pub fn is_renderable(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\u{00A0}'..='\u{00FF}') || WINANSI_EXTRAS.contains(&ch)
}

/// Replace characters the renderer cannot draw.
///
/// Line breaks survive (`\r\n` and `\r` become `\n`), tabs become spaces,
/// other control characters are dropped, and anything outside the glyph set
/// becomes [`REPLACEMENT_CHAR`]. Returns the cleaned text and the number of
/// substitutions.
pub fn sanitize(text: &str) -> (String, usize) {
    let mut out = String::with_capacity(text.len());
    let mut replaced = 0;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\n' => out.push('\n'),
            '\t' => out.push(' '),
            c if c.is_control() => {}
            c if is_renderable(c) => out.push(c),
            _ => {
                out.push(REPLACEMENT_CHAR);
                replaced += 1;
            }
        }
    }
    (out, replaced)
}

/// Font parameters that affect measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub family: FontFamily,
    pub variant: FontVariant,
    pub size: f64,
}

impl FontMetrics {
    /// Advance width of one character in points.
    pub fn char_width(&self, ch: char) -> f64 {
        let units = match self.family {
            FontFamily::Courier => 600.0,
            FontFamily::Helvetica | FontFamily::Times => {
                let base = f64::from(helvetica_advance(ch));
                let family_factor = if self.family == FontFamily::Times {
                    0.9
                } else {
                    1.0
                };
                let bold_factor = if self.variant.is_bold() { 1.05 } else { 1.0 };
                base * family_factor * bold_factor
            }
        };
        units * self.size / 1000.0
    }

    /// Width of a single line of text in points.
    pub fn measure(&self, text: &str) -> f64 {
        text.chars().map(|ch| self.char_width(ch)).sum()
    }

    pub fn line_height(&self) -> f64 {
        self.size * LINE_HEIGHT_FACTOR
    }
}

fn helvetica_advance(ch: char) -> u16 {
    if ch == '\u{2026}' {
        return 1000;
    }
    let code = u32::from(ch);
    if (32..=126).contains(&code) {
        let idx = usize::try_from(code - 32).unwrap_or(0);
        return HELVETICA_WIDTHS.get(idx).copied().unwrap_or(DEFAULT_ADVANCE);
    }
    DEFAULT_ADVANCE
}

/// Wrap text into lines that fit within `max_width`.
///
/// Explicit `\n` always breaks. Words wider than a line are broken by
/// characters.
pub fn wrap_text(text: &str, max_width: f64, font: &FontMetrics) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for paragraph in text.split('\n') {
        let mut current_line = String::new();

        for word in paragraph.split_whitespace() {
            if current_line.is_empty() {
                start_line_with(word, max_width, font, &mut lines, &mut current_line);
                continue;
            }

            // Try adding word to current line
            let test_line = format!("{current_line} {word}");
            if font.measure(&test_line) <= max_width {
                current_line = test_line;
            } else {
                // Current line is full, start new line
                lines.push(std::mem::take(&mut current_line));
                start_line_with(word, max_width, font, &mut lines, &mut current_line);
            }
        }

        // Blank paragraphs still take a line.
        lines.push(current_line);
    }

    // Trailing blank lines carry no ink.
    while lines.len() > 1 && lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

fn start_line_with(
    word: &str,
    max_width: f64,
    font: &FontMetrics,
    lines: &mut Vec<String>,
    current_line: &mut String,
) {
    if font.measure(word) <= max_width {
        *current_line = word.to_string();
        return;
    }
    // Word is too long, need to break it; the last part stays open.
    let mut parts = break_word(word, max_width, font);
    let last = parts.pop().unwrap_or_default();
    lines.extend(parts);
    *current_line = last;
}

/// Break a single word that's too long to fit on one line
fn break_word(word: &str, max_width: f64, font: &FontMetrics) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut part = String::new();
    let mut width = 0.0;

    for ch in word.chars() {
        let w = font.char_width(ch);
        // Always take at least one character per part to make progress.
        if !part.is_empty() && width + w > max_width {
            parts.push(std::mem::take(&mut part));
            width = 0.0;
        }
        part.push(ch);
        width += w;
    }
    if !part.is_empty() {
        parts.push(part);
    }
    parts
}

/// Truncate text with an ellipsis if it exceeds `max_width`.
pub fn truncate_text(text: &str, max_width: f64, font: &FontMetrics) -> String {
    if font.measure(text) <= max_width {
        return text.to_string();
    }

    let available = max_width - font.measure(ELLIPSIS);
    if available <= 0.0 {
        return ELLIPSIS.to_string();
    }

    let mut truncated = String::new();
    let mut width = 0.0;
    for ch in text.chars() {
        let w = font.char_width(ch);
        if width + w > available {
            break;
        }
        truncated.push(ch);
        width += w;
    }
    truncated.push_str(ELLIPSIS);
    truncated
}
