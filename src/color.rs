//! Color parsing for spreadsheet ARGB codes.
//!
//! Spreadsheet colors arrive as `AARRGGBB`. The alpha pair is dropped for
//! drawing; it only matters for fills, where a fully transparent code means
//! "nothing to paint".

use serde::{Serialize, Serializer};

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Rgb = Rgb::new(0, 0, 0);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);

/// Fill codes that mean "no fill" rather than an opaque rectangle.
const NO_FILL_SENTINELS: [&str; 2] = ["00000000", "FFFFFFFF"];

impl Rgb {
    /// Create a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from a 6-digit hex string (with or without #).
    /// Returns None if the format is invalid.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Convert to hex string (#RRGGBB).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        BLACK
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Outcome of resolving a fill color code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillColor {
    Solid(Rgb),
    /// Transparent or one of the reserved no-fill codes.
    NoFill,
    Invalid,
}

/// Strip the alpha pair of an `AARRGGBB` code and parse the rest.
///
/// Also accepts plain `RRGGBB`, with or without `#`.
pub fn parse_argb(s: &str) -> Option<Rgb> {
    let hex = s.trim().trim_start_matches('#');
    match hex.len() {
        8 => Rgb::from_hex(hex.get(2..)?),
        6 => Rgb::from_hex(hex),
        _ => None,
    }
}

/// Resolve a fill code, honoring the no-fill sentinels.
pub fn parse_fill(s: &str) -> FillColor {
    let hex = s.trim().trim_start_matches('#');
    if hex.is_empty() {
        return FillColor::NoFill;
    }
    if NO_FILL_SENTINELS
        .iter()
        .any(|sentinel| hex.eq_ignore_ascii_case(sentinel))
    {
        return FillColor::NoFill;
    }
    if hex.len() == 8 && hex.get(0..2) == Some("00") {
        return FillColor::NoFill;
    }
    match parse_argb(hex) {
        Some(rgb) => FillColor::Solid(rgb),
        None => FillColor::Invalid,
    }
}
