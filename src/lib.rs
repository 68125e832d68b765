//! xlpage - spreadsheet grid to printable page layout
//!
//! Takes an already-parsed worksheet (cells, styles, merges, images) and lays
//! the addressed region out onto fixed-size pages:
//! - Scale-to-fit widths, forced single page or flowing pagination
//! - Merged regions and images that never split across pages
//! - Per-field style resolution with standard-font substitution
//! - Backend-agnostic draw instructions, with an SVG backend included
//!
//! # Usage (Rust)
//!
//! ```no_run
//! use xlpage::{GridModel, LayoutConfig, LayoutEngine};
//!
//! # fn main() -> xlpage::error::Result<()> {
//! let grid = GridModel::from_json(r#"{"rowCount": 1, "columnCount": 1}"#)?;
//! let output = LayoutEngine::new(LayoutConfig::default()).render(&grid)?;
//! println!("{} page(s)", output.page_count);
//! # Ok(())
//! # }
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { layout_grid_json } from 'xlpage';
//! await init();
//! const output = JSON.parse(layout_grid_json(gridJson, null));
//! ```

pub mod cell_ref;
pub mod color;
pub mod drawings;
pub mod engine;
pub mod error;
pub mod layout;
pub mod page_setup;
pub mod render;
pub mod styles;
pub mod text;
pub mod types;

use wasm_bindgen::prelude::*;

pub use engine::{LayoutEngine, LayoutOutput};
pub use page_setup::LayoutConfig;
pub use render::{DrawInstruction, RenderBackend, SvgRenderer};
pub use types::*;

/// Lay out a grid given as JSON, with an optional JSON configuration.
///
/// # Errors
/// Returns an error if either document fails to parse, the configuration is
/// unusable, or the grid is structurally invalid.
pub fn layout_from_json(grid_json: &str, config_json: Option<&str>) -> error::Result<LayoutOutput> {
    let grid = GridModel::from_json(grid_json)?;
    let config = match config_json {
        Some(json) => LayoutConfig::from_json(json)?,
        None => LayoutConfig::default(),
    };
    LayoutEngine::new(config).render(&grid)
}

/// Lay out a grid and return the output as a JSON string
///
/// # Arguments
/// * `grid_json` - The grid model as JSON
/// * `config_json` - Layout configuration as JSON; defaults when absent
///
/// # Errors
/// Returns an error if the input is invalid.
#[wasm_bindgen]
pub fn layout_grid_json(grid_json: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let output = layout_from_json(grid_json, config_json.as_deref())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    output
        .to_json()
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Lay out a grid and return the output as a `JsValue`
///
/// This is more efficient than `layout_grid_json` when the result will be
/// used directly in JavaScript.
///
/// # Errors
/// Returns an error if the input is invalid.
#[wasm_bindgen]
pub fn layout_grid_to_js(grid_json: &str, config_json: Option<String>) -> Result<JsValue, JsValue> {
    let output = layout_from_json(grid_json, config_json.as_deref())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&output)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
