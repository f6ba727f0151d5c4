//! TemplateEngine: the merge engine's public surface
//!
//! Native callers use the typed API (`merge`, `preview`, `scan`) or the JSON
//! API (`merge_json`, `preview_json`). The editor front end calls the same
//! operations through `wasm_bindgen`, one cross-boundary call per operation.
//!
//! Every operation is a pure function of its inputs; the engine only holds
//! compiled patterns and preview configuration.

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::data::MergeData;
use crate::document::Document;
use crate::error::MergeError;
use crate::log;
use crate::merge::{MergeStats, MergeTransformer};
use crate::preview::{EngineConfig, PreviewRenderer};
use crate::scanner::{FieldMatch, FieldReport, FieldScanner};

// =============================================================================
// Types
// =============================================================================

/// Timing statistics for one merge
#[derive(Debug, Clone, Serialize, Default)]
pub struct MergeTimings {
    pub total_us: u64,
    pub scan_us: u64,
    pub merge_us: u64,
}

/// Merged document plus what happened
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutcome {
    pub document: Document,
    pub stats: MergeStats,
    pub timings: MergeTimings,
}

// =============================================================================
// TemplateEngine
// =============================================================================

#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    scanner: FieldScanner,
    renderer: PreviewRenderer,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl TemplateEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Build an engine from a JS config object, e.g. `{ preview: { filledOpen: "<b>" } }`
    #[wasm_bindgen(js_name = withConfig)]
    pub fn js_with_config(config: JsValue) -> Result<TemplateEngine, JsValue> {
        let config: EngineConfig = serde_wasm_bindgen::from_value(config).map_err(|e| {
            JsValue::from(MergeError::Serialization(format!("Invalid engine config: {}", e)))
        })?;
        log::log("[TemplateEngine] Configured from JS");
        Ok(Self::with_config(config))
    }

    /// Build an engine using a named preview preset (`default`, `html`, `plain`)
    #[wasm_bindgen(js_name = withPreset)]
    pub fn js_with_preset(name: &str) -> Result<TemplateEngine, JsValue> {
        let preview = crate::preview::PreviewConfig::preset(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown preview preset: {}", name)))?;
        Ok(Self::with_config(EngineConfig { preview }))
    }

    /// Merge data into content; returns content of the same shape
    #[wasm_bindgen(js_name = mergeTemplate)]
    pub fn js_merge_template(
        &self,
        content: JsValue,
        merge_data: JsValue,
    ) -> Result<JsValue, JsValue> {
        let (content, data) = boundary_inputs(content, merge_data)?;
        let merged = self.merge_json(&content, &data).map_err(|e| reject("mergeTemplate", e))?;
        to_js(&merged).map_err(JsValue::from)
    }

    /// Merge and report counters and timings: `{ document, stats, timings }`
    #[wasm_bindgen(js_name = mergeTemplateWithStats)]
    pub fn js_merge_template_with_stats(
        &self,
        content: JsValue,
        merge_data: JsValue,
    ) -> Result<JsValue, JsValue> {
        let (content, data) = boundary_inputs(content, merge_data)?;
        let outcome = parse(&content, &data)
            .map(|(doc, data)| self.merge_with_stats(&doc, &data))
            .map_err(|e| reject("mergeTemplateWithStats", e))?;
        to_js(&outcome).map_err(JsValue::from)
    }

    /// Preview markup with filled and missing fields marked
    #[wasm_bindgen(js_name = previewTemplate)]
    pub fn js_preview_template(
        &self,
        content: JsValue,
        merge_data: JsValue,
    ) -> Result<String, JsValue> {
        let (content, data) = boundary_inputs(content, merge_data)?;
        self.preview_json(&content, &data).map_err(|e| reject("previewTemplate", e))
    }

    /// All placeholder occurrences in document order (none resolved)
    #[wasm_bindgen(js_name = scanFields)]
    pub fn js_scan_fields(&self, content: JsValue) -> Result<JsValue, JsValue> {
        let content = from_js(content)?;
        let doc = Document::from_json(&content).map_err(|e| reject("scanFields", e))?;
        to_js(&self.scanner.scan_fields(&doc)).map_err(JsValue::from)
    }

    /// Distinct fields, occurrence counts and the names still missing a value
    #[wasm_bindgen(js_name = fieldReport)]
    pub fn js_field_report(
        &self,
        content: JsValue,
        merge_data: JsValue,
    ) -> Result<JsValue, JsValue> {
        let (content, data) = boundary_inputs(content, merge_data)?;
        let report = parse(&content, &data)
            .map(|(doc, data)| self.field_report(&doc, &data))
            .map_err(|e| reject("fieldReport", e))?;
        to_js(&report).map_err(JsValue::from)
    }
}

impl TemplateEngine {
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            scanner: FieldScanner::new(),
            renderer: PreviewRenderer::new(config.preview),
        }
    }

    pub fn scanner(&self) -> &FieldScanner {
        &self.scanner
    }

    /// Locate every placeholder, tagged with its resolution against `data`
    pub fn scan(&self, doc: &Document, data: &MergeData) -> Vec<FieldMatch> {
        self.scanner.scan(doc, data)
    }

    /// Fresh document with resolved placeholders replaced
    pub fn merge(&self, doc: &Document, data: &MergeData) -> Document {
        let matches = self.scanner.scan(doc, data);
        MergeTransformer::apply(doc, &matches, data).0
    }

    /// Merge and collect counters and timings
    pub fn merge_with_stats(&self, doc: &Document, data: &MergeData) -> MergeOutcome {
        let overall_start = instant::Instant::now();

        let scan_start = instant::Instant::now();
        let matches = self.scanner.scan(doc, data);
        let scan_us = scan_start.elapsed().as_micros() as u64;

        let merge_start = instant::Instant::now();
        let (document, stats) = MergeTransformer::apply(doc, &matches, data);
        let merge_us = merge_start.elapsed().as_micros() as u64;

        MergeOutcome {
            document,
            stats,
            timings: MergeTimings {
                total_us: overall_start.elapsed().as_micros() as u64,
                scan_us,
                merge_us,
            },
        }
    }

    /// Preview markup of the original document
    pub fn preview(&self, doc: &Document, data: &MergeData) -> String {
        let matches = self.scanner.scan(doc, data);
        self.renderer.render(doc, &matches, data)
    }

    pub fn field_report(&self, doc: &Document, data: &MergeData) -> FieldReport {
        FieldReport::from_matches(&self.scanner.scan(doc, data))
    }

    /// JSON in, JSON out. Fails on malformed content before doing any work.
    pub fn merge_json(&self, content: &Value, merge_data: &Value) -> Result<Value, MergeError> {
        let (doc, data) = parse(content, merge_data)?;
        Ok(self.merge(&doc, &data).to_json())
    }

    /// JSON in, markup out. All-or-nothing: validation happens before rendering.
    pub fn preview_json(&self, content: &Value, merge_data: &Value) -> Result<String, MergeError> {
        let (doc, data) = parse(content, merge_data)?;
        Ok(self.preview(&doc, &data))
    }
}

// =============================================================================
// Boundary helpers
// =============================================================================

fn parse(content: &Value, merge_data: &Value) -> Result<(Document, MergeData), MergeError> {
    let doc = Document::from_json(content)?;
    let data = MergeData::from_json(merge_data)?;
    Ok((doc, data))
}

fn boundary_inputs(content: JsValue, merge_data: JsValue) -> Result<(Value, Value), JsValue> {
    Ok((from_js(content)?, from_js(merge_data)?))
}

pub(crate) fn from_js(value: JsValue) -> Result<Value, MergeError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| MergeError::Serialization(e.to_string()))
}

/// Plain JS objects and arrays, not `Map`s
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, MergeError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| MergeError::Serialization(e.to_string()))
}

fn reject(operation: &str, err: MergeError) -> JsValue {
    log::warn(&format!("[TemplateEngine] {} rejected input: {}", operation, err));
    JsValue::from(err)
}

// =============================================================================
// Tests
// =============================================================================
