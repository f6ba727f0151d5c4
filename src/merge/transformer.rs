//! MergeTransformer: rewrite runs so resolved placeholders become values
//!
//! Per block: flatten, take the scanned spans, then rebuild every run by
//! slicing its flat range against those spans.
//! - The value goes into the run holding the span's first character and takes
//!   that run's formatting
//! - Text of a touched run outside any span stays in that run, in order
//! - Touched runs left with no text are dropped
//! - Untouched runs, blocks and sections are cloned as-is
//! - Unresolved placeholders are not spans here, so they pass through verbatim

use serde::{Deserialize, Serialize};

use crate::data::MergeData;
use crate::document::{Block, Document, Section};
use crate::scanner::{FieldMatch, FlatBlock};

/// Counters for one merge
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MergeStats {
    pub fields_found: usize,
    pub fields_resolved: usize,
    pub fields_unresolved: usize,
    /// Runs touched by a substitution
    pub runs_rewritten: usize,
    /// Touched runs that ended up empty and were removed
    pub runs_removed: usize,
}

/// Stateless run rewriter
pub(crate) struct MergeTransformer;

impl MergeTransformer {
    /// Apply scanned matches to `doc`.
    ///
    /// `matches` must come from scanning `doc` (document order, no overlaps).
    /// Resolution is decided against `data`: a match is substituted only when
    /// its name is non-empty and present in `data`.
    pub(crate) fn apply(
        doc: &Document,
        matches: &[FieldMatch],
        data: &MergeData,
    ) -> (Document, MergeStats) {
        let mut stats = MergeStats {
            fields_found: matches.len(),
            ..MergeStats::default()
        };
        let mut remaining = matches;

        let sections = doc
            .sections
            .iter()
            .enumerate()
            .map(|(si, section)| {
                let blocks = section
                    .blocks
                    .iter()
                    .enumerate()
                    .map(|(bi, block)| {
                        let count = remaining
                            .iter()
                            .take_while(|m| m.section == si && m.block == bi)
                            .count();
                        let (here, rest) = remaining.split_at(count);
                        remaining = rest;
                        Self::apply_block(block, here, data, &mut stats)
                    })
                    .collect();
                Section {
                    blocks,
                    attributes: section.attributes.clone(),
                    key_slot: section.key_slot,
                }
            })
            .collect();

        let merged = Document {
            sections,
            attributes: doc.attributes.clone(),
            key_slot: doc.key_slot,
        };
        (merged, stats)
    }

    /// Rewrite one block given the matches found in it
    fn apply_block(
        block: &Block,
        matches: &[FieldMatch],
        data: &MergeData,
        stats: &mut MergeStats,
    ) -> Block {
        let spans: Vec<(&FieldMatch, &str)> = matches
            .iter()
            .filter(|m| !m.name.is_empty())
            .filter_map(|m| data.get(&m.name).map(|value| (m, value)))
            .collect();

        stats.fields_resolved += spans.len();
        stats.fields_unresolved += matches.len() - spans.len();

        if spans.is_empty() {
            return block.clone();
        }

        let flat = FlatBlock::new(block);
        let text = flat.text();
        let mut inlines = Vec::with_capacity(block.inlines.len());
        let mut next = 0;

        for (ri, run) in block.inlines.iter().enumerate() {
            let range = flat.run_range(ri);

            while next < spans.len() && spans[next].0.end <= range.start {
                next += 1;
            }
            let touching: Vec<_> = spans[next..]
                .iter()
                .take_while(|(m, _)| m.start < range.end)
                .collect();

            if touching.is_empty() {
                inlines.push(run.clone());
                continue;
            }

            stats.runs_rewritten += 1;
            let mut out = String::with_capacity(run.text.len());
            let mut cursor = range.start;
            for (m, value) in touching {
                if m.start >= range.start {
                    out.push_str(&text[cursor..m.start]);
                    out.push_str(value);
                }
                cursor = cursor.max(m.end.min(range.end));
            }
            out.push_str(&text[cursor..range.end]);

            if out.is_empty() {
                stats.runs_removed += 1;
            } else {
                inlines.push(run.restyled(out));
            }
        }

        block.with_inlines(inlines)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Attributes, Inline};
    use crate::scanner::FieldScanner;
    use serde_json::json;

    fn styled(text: &str, style: &str) -> Inline {
        let mut format = Attributes::new();
        format.insert("characterFormat".to_string(), json!({ "style": style }));
        Inline::with_format(text, format)
    }

    fn single_block(inlines: Vec<Inline>) -> Document {
        Document::new(vec![Section::new(vec![Block::new(inlines)])])
    }

    fn merge(doc: &Document, data: &MergeData) -> (Document, MergeStats) {
        let matches = FieldScanner::new().scan(doc, data);
        MergeTransformer::apply(doc, &matches, data)
    }

    fn texts(doc: &Document) -> Vec<String> {
        doc.sections[0].blocks[0].inlines.iter().map(|r| r.text.clone()).collect()
    }

    // -------------------------------------------------------------------------
    // Requirement 1: Value replaces the placeholder inside its run
    // -------------------------------------------------------------------------
    #[test]
    fn test_prefix_and_suffix_kept_in_run() {
        let doc = single_block(vec![styled("Dear {{Name}},", "body")]);
        let (merged, stats) = merge(&doc, &MergeData::new().with("Name", "Alice"));

        assert_eq!(texts(&merged), vec!["Dear Alice,"]);
        let (before, after) = (&doc.sections[0].blocks[0], &merged.sections[0].blocks[0]);
        assert_eq!(after.inlines[0].format, before.inlines[0].format);
        assert_eq!(stats.fields_resolved, 1);
        assert_eq!(stats.runs_rewritten, 1);
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Split placeholders take the first run's formatting
    // -------------------------------------------------------------------------
    #[test]
    fn test_split_placeholder_collapses() {
        let doc = single_block(vec![styled("{{Na", "bold"), styled("me}}", "italic")]);
        let (merged, stats) = merge(&doc, &MergeData::new().with("Name", "Alice"));

        let runs = &merged.sections[0].blocks[0].inlines;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Alice");
        assert_eq!(runs[0].format["characterFormat"]["style"], json!("bold"));
        assert_eq!(stats.runs_removed, 1);
    }

    #[test]
    fn test_split_placeholder_keeps_remainders() {
        let doc = single_block(vec![
            styled("Hi {{Fi", "a"),
            styled("rst", "b"),
            styled("Name}} there", "c"),
        ]);
        let (merged, _) = merge(&doc, &MergeData::new().with("FirstName", "Bo"));

        let runs = &merged.sections[0].blocks[0].inlines;
        assert_eq!(texts(&merged), vec!["Hi Bo", " there"]);
        assert_eq!(runs[0].format["characterFormat"]["style"], json!("a"));
        assert_eq!(runs[1].format["characterFormat"]["style"], json!("c"));
    }

    // -------------------------------------------------------------------------
    // Requirement 3: Unresolved placeholders pass through
    // -------------------------------------------------------------------------
    #[test]
    fn test_unresolved_untouched() {
        let doc = single_block(vec![styled("{{Na", "a"), styled("me}}", "b")]);
        let (merged, stats) = merge(&doc, &MergeData::new().with("Other", "x"));

        assert_eq!(merged, doc);
        assert_eq!(stats.fields_unresolved, 1);
        assert_eq!(stats.runs_rewritten, 0);
    }

    #[test]
    fn test_mixed_resolution_in_one_run() {
        let doc = single_block(vec![Inline::new("{{A}}-{{B}}-{{A}}")]);
        let (merged, _) = merge(&doc, &MergeData::new().with("A", "1"));
        assert_eq!(texts(&merged), vec!["1-{{B}}-1"]);
    }

    // -------------------------------------------------------------------------
    // Requirement 4: Empty values and empty runs
    // -------------------------------------------------------------------------
    #[test]
    fn test_empty_value_drops_run() {
        let doc = single_block(vec![Inline::new("a "), Inline::new("{{X}}"), Inline::new(" b")]);
        let (merged, _) = merge(&doc, &MergeData::new().with("X", ""));
        assert_eq!(texts(&merged), vec!["a ", " b"]);
    }

    #[test]
    fn test_untouched_empty_runs_kept() {
        let doc = single_block(vec![Inline::new(""), Inline::new("{{X}}"), Inline::new("")]);
        let (merged, _) = merge(&doc, &MergeData::new().with("X", "v"));
        assert_eq!(texts(&merged), vec!["", "v", ""]);
    }

    #[test]
    fn test_empty_run_inside_span_removed() {
        let doc = single_block(vec![Inline::new("{{"), Inline::new(""), Inline::new("X}}")]);
        let (merged, _) = merge(&doc, &MergeData::new().with("X", "v"));
        assert_eq!(texts(&merged), vec!["v"]);
    }

    // -------------------------------------------------------------------------
    // Requirement 5: Spans ending and starting in the same run
    // -------------------------------------------------------------------------
    #[test]
    fn test_two_split_fields_share_a_run() {
        let doc = single_block(vec![
            styled("{{A", "1"),
            styled("}} and {{", "2"),
            styled("B}}", "3"),
        ]);
        let data = MergeData::new().with("A", "x").with("B", "y");
        let (merged, _) = merge(&doc, &data);

        let runs = &merged.sections[0].blocks[0].inlines;
        assert_eq!(texts(&merged), vec!["x", " and y"]);
        assert_eq!(runs[1].format["characterFormat"]["style"], json!("2"));
    }

    // -------------------------------------------------------------------------
    // Requirement 6: Structure outside substitutions is preserved
    // -------------------------------------------------------------------------
    #[test]
    fn test_other_blocks_and_attributes_preserved() {
        let mut doc = Document::new(vec![
            Section::new(vec![
                Block::new(vec![Inline::new("no fields")]),
                Block::new(vec![Inline::new("{{A}}")]),
            ]),
            Section::new(vec![Block::new(vec![Inline::new("{{A}} again")])]),
        ]);
        doc.attributes.insert("styles".to_string(), json!([]));
        doc.sections[1].blocks[0]
            .attributes
            .insert("paragraphFormat".to_string(), json!({ "x": 1 }));

        let (merged, stats) = merge(&doc, &MergeData::new().with("A", "Z"));

        assert_eq!(merged.sections[0].blocks[0], doc.sections[0].blocks[0]);
        assert_eq!(merged.sections[0].blocks[1].text(), "Z");
        assert_eq!(merged.sections[1].blocks[0].text(), "Z again");
        assert_eq!(
            merged.sections[1].blocks[0].attributes,
            doc.sections[1].blocks[0].attributes
        );
        assert_eq!(merged.attributes, doc.attributes);
        assert_eq!(stats.fields_found, 2);
    }
}
