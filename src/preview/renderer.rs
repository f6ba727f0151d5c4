//! PreviewRenderer: markup with filled and missing fields distinguished
//!
//! Renders the original (pre-merge) document. Formatting is not rendered;
//! only text, block layout and field markers.

use super::config::PreviewConfig;
use super::escape::Escaper;
use crate::data::MergeData;
use crate::document::Document;
use crate::scanner::{FieldMatch, FlatBlock};

#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    config: PreviewConfig,
    escaper: Escaper,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new(PreviewConfig::default())
    }
}

impl PreviewRenderer {
    pub fn new(config: PreviewConfig) -> Self {
        Self {
            config,
            escaper: Escaper::new(),
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Render `doc` using matches scanned from it.
    ///
    /// A match is shown as filled when its name is non-empty and present in
    /// `data`, otherwise as missing with its placeholder text.
    pub(crate) fn render(
        &self,
        doc: &Document,
        matches: &[FieldMatch],
        data: &MergeData,
    ) -> String {
        let mut out = String::new();
        let mut remaining = matches;

        for (si, section) in doc.sections.iter().enumerate() {
            if si > 0 {
                out.push_str(&self.config.section_separator);
            }
            for (bi, block) in section.blocks.iter().enumerate() {
                if bi > 0 {
                    out.push_str(&self.config.block_separator);
                }
                let count = remaining
                    .iter()
                    .take_while(|m| m.section == si && m.block == bi)
                    .count();
                let (here, rest) = remaining.split_at(count);
                remaining = rest;

                out.push_str(&self.config.block_open);
                self.render_block(&mut out, &FlatBlock::new(block), here, data);
                out.push_str(&self.config.block_close);
            }
        }

        out
    }

    fn render_block(
        &self,
        out: &mut String,
        flat: &FlatBlock,
        matches: &[FieldMatch],
        data: &MergeData,
    ) {
        let text = flat.text();
        let mut cursor = 0;

        for m in matches {
            self.push_text(out, &text[cursor..m.start]);
            let value = if m.name.is_empty() { None } else { data.get(&m.name) };
            match value {
                Some(value) => {
                    self.push_marker(out, &self.config.filled_open, &m.name);
                    self.push_text(out, value);
                    out.push_str(&self.config.filled_close);
                }
                None => {
                    self.push_marker(out, &self.config.missing_open, &m.name);
                    self.push_text(out, &m.raw);
                    out.push_str(&self.config.missing_close);
                }
            }
            cursor = m.end;
        }

        self.push_text(out, &text[cursor..]);
    }

    fn push_text(&self, out: &mut String, text: &str) {
        if self.config.escape {
            self.escaper.escape_into(out, text);
        } else {
            out.push_str(text);
        }
    }

    fn push_marker(&self, out: &mut String, marker: &str, name: &str) {
        if PreviewConfig::has_name_slot(marker) {
            let name = self.escaper.escape(name);
            out.push_str(&PreviewConfig::fill_name_slot(marker, &name));
        } else {
            out.push_str(marker);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
