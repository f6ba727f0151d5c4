//! MergeCore: Template Merge Engine
//!
//! A Rust/WASM implementation of the document application's template merge.
//!
//! # Architecture
//!
//! - `document/` - Document -> Section -> Block -> Inline model, validated JSON boundary
//! - `data.rs` - MergeData: field name -> stringified value
//! - `scanner/` - FieldScanner: `{{Field}}` detection across formatting runs
//! - `merge/` - MergeTransformer: run rewriting, formatting kept from the first run
//! - `preview/` - PreviewRenderer: filled/missing markup, escaping, presets
//! - `engine.rs` - TemplateEngine: typed, JSON and WASM entry points
//! - `live/` - LivePreview: memoized preview for keystroke-rate callers
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { mergeTemplate, previewTemplate, TemplateEngine } from 'mergecore';
//!
//! await init();
//!
//! const merged = mergeTemplate(sfdt, { Name: 'Alice' });
//! const markup = previewTemplate(sfdt, { Name: 'Alice' });
//! // "Dear <filled>Alice</filled>, welcome to <missing>{{Company}}</missing>."
//!
//! const engine = TemplateEngine.withPreset('html');
//! const report = engine.fieldReport(sfdt, formValues);
//! console.log(report.missing);
//! ```

pub mod data;
pub mod document;
pub mod engine;
pub mod error;
pub mod live;
pub mod merge;
pub mod preview;
pub mod scanner;

mod log;

pub use data::*;
pub use document::*;
pub use engine::*;
pub use error::*;
pub use live::*;
pub use merge::*;
pub use preview::*;
pub use scanner::*;

use serde_json::Value;
use wasm_bindgen::prelude::*;

#[cfg(test)]
mod tests;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("mergecore v{}", env!("CARGO_PKG_VERSION"))
}

// =============================================================================
// Top-level operations
// =============================================================================

/// Merge `merge_data` into serialized `content` with the default engine
pub fn merge_template(content: &Value, merge_data: &Value) -> Result<Value, MergeError> {
    TemplateEngine::new().merge_json(content, merge_data)
}

/// Preview markup for serialized `content` with the default engine
pub fn preview_template(content: &Value, merge_data: &Value) -> Result<String, MergeError> {
    TemplateEngine::new().preview_json(content, merge_data)
}

/// `mergeTemplate(content, mergeData)`; throws `MalformedDocumentError`
#[wasm_bindgen(js_name = mergeTemplate)]
pub fn js_merge_template(content: JsValue, merge_data: JsValue) -> Result<JsValue, JsValue> {
    TemplateEngine::new().js_merge_template(content, merge_data)
}

/// `previewTemplate(content, mergeData)`; throws `MalformedDocumentError`
#[wasm_bindgen(js_name = previewTemplate)]
pub fn js_preview_template(content: JsValue, merge_data: JsValue) -> Result<String, JsValue> {
    TemplateEngine::new().js_preview_template(content, merge_data)
}

/// `scanFields(content)`: every placeholder occurrence in document order
#[wasm_bindgen(js_name = scanFields)]
pub fn js_scan_fields(content: JsValue) -> Result<JsValue, JsValue> {
    TemplateEngine::new().js_scan_fields(content)
}

/// `fieldReport(content, mergeData)`: distinct fields and what is missing
#[wasm_bindgen(js_name = fieldReport)]
pub fn js_field_report(content: JsValue, merge_data: JsValue) -> Result<JsValue, JsValue> {
    TemplateEngine::new().js_field_report(content, merge_data)
}
