//! Preview markup configuration
//!
//! Opening markers may contain `{name}`, replaced by the escaped field name.

use serde::{Deserialize, Serialize};

const NAME_SLOT: &str = "{name}";

// =============================================================================
// PreviewConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewConfig {
    /// Wraps the value of a resolved field. Default: `<filled>`
    pub filled_open: String,
    pub filled_close: String,
    /// Wraps the placeholder text of an unresolved field. Default: `<missing>`
    pub missing_open: String,
    pub missing_close: String,
    /// Wraps each block's content. Default: empty
    pub block_open: String,
    pub block_close: String,
    /// Between blocks of one section. Default: `\n`
    pub block_separator: String,
    /// Between sections. Default: `\n`
    pub section_separator: String,
    /// Escape text content. Default: true
    pub escape: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            filled_open: "<filled>".to_string(),
            filled_close: "</filled>".to_string(),
            missing_open: "<missing>".to_string(),
            missing_close: "</missing>".to_string(),
            block_open: String::new(),
            block_close: String::new(),
            block_separator: "\n".to_string(),
            section_separator: "\n".to_string(),
            escape: true,
        }
    }
}

impl PreviewConfig {
    /// HTML preset: `<p>` per block, `<span>` per field with CSS classes
    pub fn html() -> Self {
        Self {
            filled_open: r#"<span class="merge-field merge-field--filled" data-field="{name}">"#
                .to_string(),
            filled_close: "</span>".to_string(),
            missing_open: r#"<span class="merge-field merge-field--missing" data-field="{name}">"#
                .to_string(),
            missing_close: "</span>".to_string(),
            block_open: "<p>".to_string(),
            block_close: "</p>".to_string(),
            block_separator: String::new(),
            section_separator: String::new(),
            escape: true,
        }
    }

    /// Plain text preset: brackets instead of tags, no escaping
    pub fn plain() -> Self {
        Self {
            filled_open: "[".to_string(),
            filled_close: "]".to_string(),
            missing_open: "[?".to_string(),
            missing_close: "]".to_string(),
            escape: false,
            ..Self::default()
        }
    }

    /// Look up a preset by name (`default`, `html`, `plain`)
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" | "tags" => Some(Self::default()),
            "html" => Some(Self::html()),
            "plain" | "text" => Some(Self::plain()),
            _ => None,
        }
    }

    pub(crate) fn has_name_slot(marker: &str) -> bool {
        marker.contains(NAME_SLOT)
    }

    pub(crate) fn fill_name_slot(marker: &str, escaped_name: &str) -> String {
        marker.replace(NAME_SLOT, escaped_name)
    }
}

// =============================================================================
// EngineConfig
// =============================================================================

/// Top-level engine configuration (from JS: `{ preview: {...} }`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub preview: PreviewConfig,
}

impl EngineConfig {
    pub fn html() -> Self {
        Self {
            preview: PreviewConfig::html(),
        }
    }
}
