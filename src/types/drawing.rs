use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::CellCoord;

/// An embedded image payload owned by the grid's image table.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedImage {
    /// Unique identifier referenced by anchors and cells
    pub id: String,
    /// Format tag supplied by the parser (sniffed from the bytes when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
    /// Raw image bytes, base64 in JSON
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Two-cell image anchor. Refers to the payload by id, never by copy.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnchor {
    pub top_left: CellCoord,
    pub bottom_right: CellCoord,
    pub image_id: String,
}

/// Image format/MIME type detection
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    Webp,
    Emf,
    Wmf,
    Unknown,
}

impl ImageFormat {
    /// Detect image format from file extension
    #[must_use]
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            "webp" => Self::Webp,
            "emf" => Self::Emf,
            "wmf" => Self::Wmf,
            _ => Self::Unknown,
        }
    }

    /// Detect image format from magic bytes
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Self::Gif;
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return Self::Bmp;
        }

        // TIFF: II or MM
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Self::Tiff;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP") {
            return Self::Webp;
        }

        // EMF: 01 00 00 00
        if data.starts_with(&[0x01, 0x00, 0x00, 0x00]) && data.len() >= 40 {
            return Self::Emf;
        }

        // WMF: D7 CD C6 9A
        if data.starts_with(&[0xD7, 0xCD, 0xC6, 0x9A]) {
            return Self::Wmf;
        }

        Self::Unknown
    }

    /// Get MIME type for this image format
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Webp => "image/webp",
            Self::Emf => "image/x-emf",
            Self::Wmf => "image/x-wmf",
            Self::Unknown => "application/octet-stream",
        }
    }
}

mod base64_bytes {
    use super::{Deserialize, Deserializer, Serializer};
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(s.trim()).map_err(serde::de::Error::custom)
    }
}
