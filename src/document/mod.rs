//! Document model: Document -> Section -> Block -> Inline
//!
//! The editor hands us a JSON tree (SFDT-like). It is validated once at the
//! boundary by [`Document::from_json`]; everything past that point works on
//! these record types. Properties the engine does not understand
//! (`characterFormat`, `paragraphFormat`, `sectionFormat`, `styles`, ...) are
//! kept verbatim in each node's attribute map so the round trip is lossless.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MergeError;

/// Opaque properties carried through unchanged
pub type Attributes = Map<String, Value>;

const SECTIONS_KEY: &str = "sections";
const BLOCKS_KEY: &str = "blocks";
const INLINES_KEY: &str = "inlines";
const TEXT_KEY: &str = "text";

// =============================================================================
// Types
// =============================================================================

/// Root container. Serializes through [`Document::to_json`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "Value")]
pub struct Document {
    pub sections: Vec<Section>,
    #[serde(flatten)]
    pub attributes: Attributes,
    /// Position of `sections` among the node's keys as read
    #[serde(skip)]
    pub(crate) key_slot: usize,
}

/// Structural grouping of blocks. Carries no text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub blocks: Vec<Block>,
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(skip)]
    pub(crate) key_slot: usize,
}

/// Paragraph-like unit: an ordered run sequence
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub inlines: Vec<Inline>,
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(skip)]
    pub(crate) key_slot: usize,
}

/// A run: text plus an opaque formatting descriptor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Inline {
    pub text: String,
    #[serde(flatten)]
    pub format: Attributes,
    #[serde(skip)]
    pub(crate) key_slot: usize,
}

// =============================================================================
// Constructors
// =============================================================================

impl Document {
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Iterate `(section index, block index, block)` in document order
    pub fn blocks(&self) -> impl Iterator<Item = (usize, usize, &Block)> {
        self.sections.iter().enumerate().flat_map(|(si, section)| {
            section.blocks.iter().enumerate().map(move |(bi, block)| (si, bi, block))
        })
    }
}

impl Section {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }
}

impl Block {
    pub fn new(inlines: Vec<Inline>) -> Self {
        Self {
            inlines,
            ..Self::default()
        }
    }

    /// Same attributes, different runs
    pub(crate) fn with_inlines(&self, inlines: Vec<Inline>) -> Self {
        Self {
            inlines,
            attributes: self.attributes.clone(),
            key_slot: self.key_slot,
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.inlines.iter().map(|run| run.text.as_str()).collect()
    }
}

impl Inline {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_format(text, Attributes::new())
    }

    pub fn with_format(text: impl Into<String>, format: Attributes) -> Self {
        Self {
            text: text.into(),
            format,
            key_slot: 0,
        }
    }

    /// Same formatting, different text
    pub fn restyled(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: self.format.clone(),
            key_slot: self.key_slot,
        }
    }
}

// =============================================================================
// JSON boundary
// =============================================================================

impl Document {
    /// Validate and convert a serialized document.
    ///
    /// Fails with [`MergeError::MalformedDocument`] naming the first node that
    /// breaks the Section -> Block -> Inline shape. No partial recovery.
    pub fn from_json(value: &Value) -> Result<Self, MergeError> {
        let node = split_node(value, "", SECTIONS_KEY)?;
        let mut sections = Vec::with_capacity(node.children.len());
        for (si, section) in node.children.iter().enumerate() {
            let path = format!("/{}/{}", SECTIONS_KEY, si);
            sections.push(Section::from_json(section, &path)?);
        }
        Ok(Document {
            sections,
            attributes: node.attributes,
            key_slot: node.key_slot,
        })
    }

    /// Serialize back to the editor's shape, keys in their original order
    pub fn to_json(&self) -> Value {
        let sections = self.sections.iter().map(Section::to_json).collect();
        join_node(SECTIONS_KEY, Value::Array(sections), &self.attributes, self.key_slot)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.to_json()
    }
}

impl Section {
    fn from_json(value: &Value, path: &str) -> Result<Self, MergeError> {
        let node = split_node(value, path, BLOCKS_KEY)?;
        let mut blocks = Vec::with_capacity(node.children.len());
        for (bi, block) in node.children.iter().enumerate() {
            let block_path = format!("{}/{}/{}", path, BLOCKS_KEY, bi);
            blocks.push(Block::from_json(block, &block_path)?);
        }
        Ok(Section {
            blocks,
            attributes: node.attributes,
            key_slot: node.key_slot,
        })
    }

    fn to_json(&self) -> Value {
        let blocks = self.blocks.iter().map(Block::to_json).collect();
        join_node(BLOCKS_KEY, Value::Array(blocks), &self.attributes, self.key_slot)
    }
}

impl Block {
    fn from_json(value: &Value, path: &str) -> Result<Self, MergeError> {
        let node = split_node(value, path, INLINES_KEY)?;
        let mut inlines = Vec::with_capacity(node.children.len());
        for (ri, run) in node.children.iter().enumerate() {
            let run_path = format!("{}/{}/{}", path, INLINES_KEY, ri);
            inlines.push(Inline::from_json(run, &run_path)?);
        }
        Ok(Block {
            inlines,
            attributes: node.attributes,
            key_slot: node.key_slot,
        })
    }

    fn to_json(&self) -> Value {
        let inlines = self.inlines.iter().map(Inline::to_json).collect();
        join_node(INLINES_KEY, Value::Array(inlines), &self.attributes, self.key_slot)
    }
}

impl Inline {
    fn from_json(value: &Value, path: &str) -> Result<Self, MergeError> {
        let object = value.as_object().ok_or_else(|| {
            MergeError::malformed(
                path,
                format!("expected a run object, found {}", kind_of(value)),
            )
        })?;
        let text = match object.get(TEXT_KEY) {
            Some(Value::String(text)) => text.clone(),
            Some(other) => {
                return Err(MergeError::malformed(
                    format!("{}/{}", path, TEXT_KEY),
                    format!("run text must be a string, found {}", kind_of(other)),
                ))
            }
            None => return Err(MergeError::malformed(path, "run is missing `text`")),
        };
        Ok(Inline {
            text,
            format: without_key(object, TEXT_KEY),
            key_slot: key_slot(object, TEXT_KEY),
        })
    }

    fn to_json(&self) -> Value {
        let text = Value::String(self.text.clone());
        join_node(TEXT_KEY, text, &self.format, self.key_slot)
    }
}

/// A container node split into its child array and everything else
struct SplitNode<'a> {
    children: &'a [Value],
    attributes: Attributes,
    key_slot: usize,
}

fn split_node<'a>(value: &'a Value, path: &str, key: &str) -> Result<SplitNode<'a>, MergeError> {
    let object = value.as_object().ok_or_else(|| {
        MergeError::malformed(path, format!("expected an object, found {}", kind_of(value)))
    })?;
    let children = match object.get(key) {
        Some(Value::Array(list)) => list,
        Some(other) => {
            return Err(MergeError::malformed(
                format!("{}/{}", path, key),
                format!("`{}` must be an array, found {}", key, kind_of(other)),
            ))
        }
        None => return Err(MergeError::malformed(path, format!("missing `{}` array", key))),
    };
    Ok(SplitNode {
        children,
        attributes: without_key(object, key),
        key_slot: key_slot(object, key),
    })
}

/// Every entry but `key`, in order. `Map::remove` would swap entries around.
fn without_key(object: &Attributes, key: &str) -> Attributes {
    object
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn key_slot(object: &Attributes, key: &str) -> usize {
    object.keys().position(|k| k == key).unwrap_or(0)
}

/// Rebuild a node with `key` back at `slot` among its attributes
fn join_node(key: &str, children: Value, attributes: &Attributes, slot: usize) -> Value {
    let mut object = Attributes::new();
    let mut children = Some(children);
    for (i, (k, v)) in attributes.iter().enumerate() {
        if i == slot {
            if let Some(children) = children.take() {
                object.insert(key.to_string(), children);
            }
        }
        object.insert(k.clone(), v.clone());
    }
    if let Some(children) = children {
        object.insert(key.to_string(), children);
    }
    Value::Object(object)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Tests
// =============================================================================
