//! FlatBlock: one logical string per block with an offset map back to runs
//!
//! Prior formatting edits can split `{{`, the field name and `}}` across any
//! number of runs. Matching happens on the concatenated text; the offset map
//! turns a flat span back into per-run fragments.

use std::ops::Range;

use crate::document::Block;

/// A block's text flattened across its runs
#[derive(Debug, Clone)]
pub struct FlatBlock {
    text: String,
    /// Flat byte range covered by each run, in run order
    run_ranges: Vec<Range<usize>>,
}

/// A piece of a flat span that falls inside one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSlice {
    pub run: usize,
    /// Byte offsets inside the run's own text
    pub start: usize,
    pub end: usize,
}

impl FlatBlock {
    pub fn new(block: &Block) -> Self {
        let mut text = String::new();
        let mut run_ranges = Vec::with_capacity(block.inlines.len());
        for run in &block.inlines {
            let start = text.len();
            text.push_str(&run.text);
            run_ranges.push(start..text.len());
        }
        Self { text, run_ranges }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Flat range covered by `run`
    pub fn run_range(&self, run: usize) -> Range<usize> {
        self.run_ranges[run].clone()
    }

    /// Split a flat span into run slices, skipping runs it does not touch.
    ///
    /// The slices' text, concatenated in order, equals `&text[span]`.
    pub fn slices(&self, span: Range<usize>) -> Vec<RunSlice> {
        let first = self.run_ranges.partition_point(|r| r.end <= span.start);
        self.run_ranges[first..]
            .iter()
            .enumerate()
            .take_while(|(_, r)| r.start < span.end)
            .filter_map(|(i, r)| {
                let start = span.start.max(r.start);
                let end = span.end.min(r.end);
                (start < end).then(|| RunSlice {
                    run: first + i,
                    start: start - r.start,
                    end: end - r.start,
                })
            })
            .collect()
    }
}
