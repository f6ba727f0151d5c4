//! ChangeDetector: content-addressable change detection
//!
//! Fingerprints (content, merge data) pairs so a live preview can skip
//! re-rendering when nothing changed between keystrokes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::data::MergeData;

// =============================================================================
// Types
// =============================================================================

/// Result of change detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeResult {
    /// True if inputs changed since the last check
    pub has_changed: bool,
    pub input_hash: u64,
    pub previous_hash: Option<u64>,
}

// =============================================================================
// ChangeDetector
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    last_hash: Option<u64>,
    check_count: u64,
    skip_count: u64,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the fingerprint of `(content, data)` and compare with the last one
    pub fn check(&mut self, content: &Value, data: &MergeData) -> ChangeResult {
        self.check_count += 1;

        let input_hash = Self::fingerprint(content, data);
        let previous_hash = self.last_hash;
        let has_changed = previous_hash != Some(input_hash);

        if !has_changed {
            self.skip_count += 1;
        }
        self.last_hash = Some(input_hash);

        ChangeResult {
            has_changed,
            input_hash,
            previous_hash,
        }
    }

    /// Hash of content (serialized) and merge data (sorted pairs)
    pub fn fingerprint(content: &Value, data: &MergeData) -> u64 {
        let mut hasher = DefaultHasher::new();
        content.to_string().hash(&mut hasher);
        data.canonical_pairs().hash(&mut hasher);
        hasher.finish()
    }

    /// Skip rate as percentage
    pub fn skip_rate(&self) -> f64 {
        if self.check_count == 0 {
            return 0.0;
        }
        (self.skip_count as f64 / self.check_count as f64) * 100.0
    }

    pub fn check_count(&self) -> u64 {
        self.check_count
    }

    pub fn skip_count(&self) -> u64 {
        self.skip_count
    }

    pub fn last_hash(&self) -> Option<u64> {
        self.last_hash
    }

    /// Forget the last fingerprint so the next check counts as changed
    pub fn invalidate(&mut self) {
        self.last_hash = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// Tests
// =============================================================================
