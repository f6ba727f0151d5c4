//! FieldScanner - Merge field detection via Regex
//!
//! Detects `{{FieldName}}` placeholders across a whole document:
//! - Each block is flattened so placeholders split across runs are found
//! - Matches never cross block boundaries
//! - Non-nested, nearest closing `}}`: `{{A {{B}}` yields `{{B}}`
//! - Names are trimmed; `{{}}` is an unresolved match with an empty name

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::flatten::FlatBlock;
use crate::data::MergeData;
use crate::document::{Block, Document};

// =============================================================================
// Types
// =============================================================================

/// The part of a placeholder that lives in one run
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldFragment {
    pub section: usize,
    pub block: usize,
    pub run: usize,
    /// Byte offsets inside the run's text
    pub start: usize,
    pub end: usize,
}

/// A single placeholder occurrence
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FieldMatch {
    /// Trimmed field name, case preserved
    pub name: String,
    /// Placeholder text as written, braces included
    pub raw: String,
    pub section: usize,
    pub block: usize,
    /// Byte offsets inside the flattened block text
    pub start: usize,
    pub end: usize,
    /// Per-run pieces; their text concatenates to `raw`
    pub fragments: Vec<FieldFragment>,
    /// Name is a key of the merge data
    pub resolved: bool,
}

// =============================================================================
// FieldScanner
// =============================================================================

/// Placeholder scanner
#[derive(Debug, Clone)]
pub struct FieldScanner {
    field_re: Regex,
}

impl Default for FieldScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldScanner {
    pub fn new() -> Self {
        // {{ name }}
        // Group 1: everything between the braces, no `{` or `}` allowed,
        // so the nearest `}}` always closes and nothing nests.
        let field_re = Regex::new(r"\{\{([^{}]*)\}\}").expect("Field regex should compile");
        Self { field_re }
    }

    /// Scan a whole document in document order
    pub fn scan(&self, doc: &Document, data: &MergeData) -> Vec<FieldMatch> {
        doc.blocks()
            .flat_map(|(si, bi, block)| self.scan_block(block, si, bi, data))
            .collect()
    }

    /// Scan without merge data: every match is unresolved
    pub fn scan_fields(&self, doc: &Document) -> Vec<FieldMatch> {
        self.scan(doc, &MergeData::new())
    }

    /// Scan one block
    pub fn scan_block(
        &self,
        block: &Block,
        section: usize,
        block_index: usize,
        data: &MergeData,
    ) -> Vec<FieldMatch> {
        let flat = FlatBlock::new(block);
        self.scan_flat(&flat, section, block_index, data)
    }

    fn scan_flat(
        &self,
        flat: &FlatBlock,
        section: usize,
        block: usize,
        data: &MergeData,
    ) -> Vec<FieldMatch> {
        self.field_re
            .captures_iter(flat.text())
            .filter_map(|cap| {
                let full = cap.get(0)?;
                let name = cap.get(1)?.as_str().trim();

                let fragments = flat
                    .slices(full.range())
                    .into_iter()
                    .map(|slice| FieldFragment {
                        section,
                        block,
                        run: slice.run,
                        start: slice.start,
                        end: slice.end,
                    })
                    .collect();

                Some(FieldMatch {
                    name: name.to_string(),
                    raw: full.as_str().to_string(),
                    section,
                    block,
                    start: full.start(),
                    end: full.end(),
                    fragments,
                    resolved: !name.is_empty() && data.contains(name),
                })
            })
            .collect()
    }

    /// Does `text` contain any placeholder?
    pub fn has_fields(&self, text: &str) -> bool {
        self.field_re.is_match(text)
    }
}

// =============================================================================
// Tests
// =============================================================================
