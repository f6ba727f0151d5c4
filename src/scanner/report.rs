//! FieldReport: what a template asks for and what is still missing
//!
//! Drives the data-entry form (which fields to collect) and submission
//! gating (`is_complete`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::field::FieldMatch;

/// One distinct field name
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FieldSummary {
    pub name: String,
    pub occurrences: usize,
    pub resolved: bool,
}

/// Aggregate view over a scan
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct FieldReport {
    /// Distinct non-empty names in first-occurrence order
    pub fields: Vec<FieldSummary>,
    /// Names with no value in the merge data
    pub missing: Vec<String>,
    pub total_occurrences: usize,
    pub resolved_occurrences: usize,
    /// `{{}}` placeholders; these can never resolve
    pub empty_placeholders: usize,
}

impl FieldReport {
    pub fn from_matches(matches: &[FieldMatch]) -> Self {
        let mut report = FieldReport::default();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for m in matches {
            report.total_occurrences += 1;
            if m.resolved {
                report.resolved_occurrences += 1;
            }
            if m.name.is_empty() {
                report.empty_placeholders += 1;
                continue;
            }
            match index.get(m.name.as_str()) {
                Some(&i) => report.fields[i].occurrences += 1,
                None => {
                    index.insert(m.name.as_str(), report.fields.len());
                    report.fields.push(FieldSummary {
                        name: m.name.clone(),
                        occurrences: 1,
                        resolved: m.resolved,
                    });
                }
            }
        }

        report.missing = report
            .fields
            .iter()
            .filter(|f| !f.resolved)
            .map(|f| f.name.clone())
            .collect();
        report
    }

    pub fn unresolved_occurrences(&self) -> usize {
        self.total_occurrences - self.resolved_occurrences
    }

    /// Every placeholder has a value
    pub fn is_complete(&self) -> bool {
        self.unresolved_occurrences() == 0
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}
