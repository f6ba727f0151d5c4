//! MergeData: flat field name -> value mapping
//!
//! Values are stored already stringified. Lookup is exact and
//! case-sensitive; keys no placeholder refers to are simply never read.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::MergeError;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MergeData {
    values: HashMap<String, String>,
}

impl MergeData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build from a JSON object, stringifying non-string values.
    ///
    /// `null` input is treated as empty data. `null` values become the empty
    /// string, numbers and booleans use their JSON text, arrays and objects are
    /// written as compact JSON.
    pub fn from_json(value: &Value) -> Result<Self, MergeError> {
        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(MergeError::InvalidMergeData {
                    reason: format!(
                        "expected an object of field values, found {}",
                        json_type(other)
                    ),
                })
            }
        };

        let values = object
            .iter()
            .map(|(name, value)| (name.clone(), stringify(value)))
            .collect();
        Ok(Self { values })
    }

    /// Stable fingerprint input for memoization (sorted by key)
    pub(crate) fn canonical_pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MergeData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let values = iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { values }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    }
}

/// JS hands over every number as f64; print integral values without `.0`
fn number_text(n: &serde_json::Number) -> String {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    let float = n.as_f64().filter(|_| !n.is_i64() && !n.is_u64());
    match float {
        Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
