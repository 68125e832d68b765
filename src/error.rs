//! Structured error types for xlpage.
//!
//! Only precondition failures are errors. Anything the layout can degrade
//! around (bad colors, broken images, out-of-bounds merges) is reported as a
//! [`Diagnostic`](crate::types::Diagnostic) on the output instead.

/// All errors that can occur before or after a layout pass.
#[derive(Debug, thiserror::Error)]
pub enum XlpageError {
    /// The grid is structurally invalid (missing or zero coordinates).
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    /// The configuration cannot describe a usable page.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Malformed cell reference such as `"A0"` or `"1A"`.
    #[error("Invalid cell reference: {0}")]
    CellRef(String),

    /// JSON (de)serialization failure.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// XML writer error from the SVG backend.
    #[error("XML writing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Renderer failure that is not an XML or I/O error.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlpageError>;

#[cfg(target_arch = "wasm32")]
impl From<XlpageError> for wasm_bindgen::JsValue {
    fn from(e: XlpageError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
