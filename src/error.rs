//! Error types for the merge engine.
//!
//! Unresolved fields are not errors. The only structural failure is a
//! document that does not have the Section -> Block -> Inline shape.

use wasm_bindgen::JsValue;

/// Merge engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum MergeError {
    /// Content does not conform to the Section/Block/Inline shape.
    /// `path` points at the offending node, e.g. `/sections/0/blocks/2/inlines`.
    MalformedDocument { path: String, reason: String },
    /// Merge data is not a flat object
    InvalidMergeData { reason: String },
    /// Conversion failure at the JS boundary
    Serialization(String),
}

impl MergeError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        MergeError::MalformedDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Error kind as exposed to JavaScript (`Error.name`)
    pub fn kind(&self) -> &'static str {
        match self {
            MergeError::MalformedDocument { .. } => "MalformedDocumentError",
            MergeError::InvalidMergeData { .. } => "InvalidMergeDataError",
            MergeError::Serialization(_) => "SerializationError",
        }
    }
}

impl std::fmt::Display for MergeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MergeError::MalformedDocument { path, reason } => {
                if path.is_empty() {
                    write!(f, "Malformed document: {}", reason)
                } else {
                    write!(f, "Malformed document at {}: {}", path, reason)
                }
            }
            MergeError::InvalidMergeData { reason } => write!(f, "Invalid merge data: {}", reason),
            MergeError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for MergeError {}

impl From<MergeError> for JsValue {
    fn from(err: MergeError) -> Self {
        let js_err = js_sys::Error::new(&err.to_string());
        js_err.set_name(err.kind());
        js_err.into()
    }
}
