//! LivePreview: memoized preview for high-frequency callers
//!
//! The data-entry form re-renders the preview on every keystroke. The engine
//! itself keeps no state; this caller-owned wrapper returns the previous
//! markup when neither the content nor the merge data changed.

pub mod change;

pub use change::*;

use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::data::MergeData;
use crate::document::Document;
use crate::engine::{from_js, TemplateEngine};
use crate::error::MergeError;
use crate::log;
use crate::preview::{EngineConfig, PreviewConfig};

#[wasm_bindgen]
pub struct LivePreview {
    engine: TemplateEngine,
    change_detector: ChangeDetector,
    last_markup: Option<String>,
}

impl Default for LivePreview {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl LivePreview {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_engine(TemplateEngine::new())
    }

    /// Live preview using a named preset (`default`, `html`, `plain`)
    #[wasm_bindgen(js_name = withPreset)]
    pub fn js_with_preset(name: &str) -> Result<LivePreview, JsValue> {
        let preview = PreviewConfig::preset(name)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown preview preset: {}", name)))?;
        Ok(Self::with_engine(TemplateEngine::with_config(EngineConfig { preview })))
    }

    /// Render, reusing the last markup when inputs are unchanged
    #[wasm_bindgen(js_name = render)]
    pub fn js_render(&mut self, content: JsValue, merge_data: JsValue) -> Result<String, JsValue> {
        let content = from_js(content)?;
        let merge_data = from_js(merge_data)?;
        self.render_json(&content, &merge_data).map_err(|e| {
            log::error(&format!("[LivePreview] Render failed: {}", e));
            JsValue::from(e)
        })
    }

    /// Percentage of renders served from cache
    #[wasm_bindgen(js_name = skipRate)]
    pub fn skip_rate(&self) -> f64 {
        self.change_detector.skip_rate()
    }

    /// Drop the cached markup and fingerprint
    #[wasm_bindgen(js_name = reset)]
    pub fn js_reset(&mut self) {
        self.reset();
    }
}

impl LivePreview {
    pub fn with_engine(engine: TemplateEngine) -> Self {
        Self {
            engine,
            change_detector: ChangeDetector::new(),
            last_markup: None,
        }
    }

    /// Render serialized content. Failures are never cached.
    pub fn render_json(
        &mut self,
        content: &Value,
        merge_data: &Value,
    ) -> Result<String, MergeError> {
        let data = MergeData::from_json(merge_data)?;
        let change = self.change_detector.check(content, &data);

        if !change.has_changed {
            if let Some(ref cached) = self.last_markup {
                return Ok(cached.clone());
            }
        }

        let doc = match Document::from_json(content) {
            Ok(doc) => doc,
            Err(e) => {
                // Same bad input next time is a fresh render, not a cache hit
                self.change_detector.invalidate();
                self.last_markup = None;
                return Err(e);
            }
        };
        let markup = self.engine.preview(&doc, &data);
        self.last_markup = Some(markup.clone());
        Ok(markup)
    }

    pub fn check_count(&self) -> u64 {
        self.change_detector.check_count()
    }

    pub fn reset(&mut self) {
        self.change_detector.reset();
        self.last_markup = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(text: &str) -> Value {
        json!({ "sections": [{ "blocks": [{ "inlines": [{ "text": text }] }] }] })
    }

    #[test]
    fn test_cached_markup_reused() {
        let mut live = LivePreview::new();
        let data = json!({ "Name": "Al" });

        let first = live.render_json(&content("Hi {{Name}}"), &data).unwrap();
        let second = live.render_json(&content("Hi {{Name}}"), &data).unwrap();

        assert_eq!(first, "Hi <filled>Al</filled>");
        assert_eq!(first, second);
        assert_eq!(live.check_count(), 2);
        assert!((live.skip_rate() - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_data_edit_rerenders() {
        let mut live = LivePreview::new();
        live.render_json(&content("Hi {{Name}}"), &json!({ "Name": "Al" })).unwrap();
        let markup = live
            .render_json(&content("Hi {{Name}}"), &json!({ "Name": "Alice" }))
            .unwrap();
        assert_eq!(markup, "Hi <filled>Alice</filled>");
    }

    #[test]
    fn test_failures_not_cached() {
        let mut live = LivePreview::new();
        let bad = json!({ "sections": [{}] });

        assert!(live.render_json(&bad, &json!({})).is_err());
        assert!(live.render_json(&bad, &json!({})).is_err());
        assert_eq!(live.render_json(&content("ok"), &json!({})).unwrap(), "ok");
    }

    #[test]
    fn test_repeated_failures_are_not_skips() {
        let mut live = LivePreview::new();
        let bad = json!({ "sections": [{}] });

        assert!(live.render_json(&bad, &json!({})).is_err());
        assert!(live.render_json(&bad, &json!({})).is_err());
        assert_eq!(live.check_count(), 2);
        assert_eq!(live.skip_rate(), 0.0);

        live.render_json(&content("ok"), &json!({})).unwrap();
        live.render_json(&content("ok"), &json!({})).unwrap();
        assert!((live.skip_rate() - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_reset_clears_cache() {
        let mut live = LivePreview::new();
        live.render_json(&content("a"), &json!({})).unwrap();
        live.reset();
        assert_eq!(live.check_count(), 0);
        assert_eq!(live.skip_rate(), 0.0);
    }
}
