//! Merge properties across scanner + transformer
//!
//! Covers: identity on placeholder-free documents, full resolution,
//! pass-through with empty data, split-run collapse, idempotence and
//! case-sensitive lookup.

use super::fixtures::{blocks, fragmented_letter, one_block, plain, run, style_of};
use crate::data::MergeData;
use crate::document::Document;
use crate::engine::TemplateEngine;
use crate::scanner::FieldScanner;

fn full_data() -> MergeData {
    MergeData::new()
        .with("FirstName", "Ann")
        .with("Company", "Acme")
        .with("ID", "7")
        .with("Sender", "Pat")
        .with("Title", ", CEO")
}

fn run_texts(doc: &Document, section: usize, block: usize) -> Vec<&str> {
    doc.sections[section].blocks[block]
        .inlines
        .iter()
        .map(|r| r.text.as_str())
        .collect()
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_no_placeholders_is_identity() {
    let engine = TemplateEngine::new();
    let doc = one_block(vec![
        run("Plain ", "a"),
        run("{text} with } braces {", "b"),
        plain(""),
    ]);

    assert_eq!(engine.merge(&doc, &full_data()), doc);
    assert_eq!(engine.merge(&doc, &MergeData::new()), doc);
}

#[test]
fn test_empty_data_keeps_placeholders() {
    let engine = TemplateEngine::new();
    let doc = fragmented_letter();
    assert_eq!(engine.merge(&doc, &MergeData::new()), doc);
}

#[test]
fn test_empty_document() {
    let engine = TemplateEngine::new();
    let merged = engine.merge(&Document::empty(), &full_data());
    assert!(merged.is_empty());
}

#[test]
fn test_input_not_mutated() {
    let engine = TemplateEngine::new();
    let doc = fragmented_letter();
    let before = doc.clone();
    let _ = engine.merge(&doc, &full_data());
    assert_eq!(doc, before);
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn test_full_data_leaves_no_placeholders() {
    let engine = TemplateEngine::new();
    let scanner = FieldScanner::new();
    let merged = engine.merge(&fragmented_letter(), &full_data());

    for (_, _, block) in merged.blocks() {
        assert!(!scanner.has_fields(&block.text()), "leftover field in {:?}", block.text());
    }
}

#[test]
fn test_fragmented_letter_runs() {
    let engine = TemplateEngine::new();
    let merged = engine.merge(&fragmented_letter(), &full_data());

    assert_eq!(run_texts(&merged, 0, 0), vec!["Dear ", "Ann", ","]);
    let first = &merged.sections[0].blocks[0].inlines;
    assert_eq!(style_of(&first[1]), "bold");
    assert_eq!(style_of(&first[2]), "body");

    assert_eq!(run_texts(&merged, 0, 1), vec!["Welcome to Acme. Your ID is 7", "."]);
    assert!(merged.sections[1].blocks[0].inlines.is_empty());
    assert_eq!(run_texts(&merged, 1, 1), vec!["", "Regards, Pat, CEO"]);
}

#[test]
fn test_split_name_example() {
    let engine = TemplateEngine::new();
    let doc = one_block(vec![run("{{Na", "first"), run("me}}", "second")]);
    let merged = engine.merge(&doc, &MergeData::new().with("Name", "Alice"));

    let runs = &merged.sections[0].blocks[0].inlines;
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].text, "Alice");
    assert_eq!(style_of(&runs[0]), "first");
}

#[test]
fn test_letter_example() {
    let engine = TemplateEngine::new();
    let doc = one_block(vec![
        plain("Dear "),
        plain("{{Name}}"),
        plain(", welcome to "),
        plain("{{Company}}"),
        plain("."),
    ]);
    let merged = engine.merge(&doc, &MergeData::new().with("Name", "Alice"));

    assert_eq!(
        run_texts(&merged, 0, 0),
        vec!["Dear ", "Alice", ", welcome to ", "{{Company}}", "."]
    );
}

#[test]
fn test_lookup_is_case_sensitive() {
    let engine = TemplateEngine::new();
    let doc = blocks(vec![vec!["{{Name}}"]]);
    assert_eq!(engine.merge(&doc, &MergeData::new().with("name", "x")), doc);
}

#[test]
fn test_unused_keys_ignored() {
    let engine = TemplateEngine::new();
    let doc = blocks(vec![vec!["{{A}}"]]);
    let data = MergeData::new().with("A", "1").with("Unused", "2");
    assert_eq!(run_texts(&engine.merge(&doc, &data), 0, 0), vec!["1"]);
}

#[test]
fn test_value_with_braces_inserted_literally() {
    let engine = TemplateEngine::new();
    let doc = blocks(vec![vec!["{{A}} {{B}}"]]);
    let data = MergeData::new().with("A", "{{B}}").with("B", "b");
    assert_eq!(run_texts(&engine.merge(&doc, &data), 0, 0), vec!["{{B}} b"]);
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_merge_is_idempotent() {
    let engine = TemplateEngine::new();
    let doc = fragmented_letter();
    let partial = MergeData::new().with("FirstName", "Ann").with("Sender", "Pat");

    for data in [MergeData::new(), partial, full_data()] {
        let once = engine.merge(&doc, &data);
        let twice = engine.merge(&once, &data);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_unresolved_fields_survive_merge() {
    let engine = TemplateEngine::new();
    let merged = engine.merge(&fragmented_letter(), &MergeData::new().with("FirstName", "Ann"));
    let names: Vec<String> = engine
        .scanner()
        .scan_fields(&merged)
        .into_iter()
        .map(|m| m.name)
        .collect();
    assert_eq!(names, vec!["Company", "ID", "Sender", "Title"]);
}
