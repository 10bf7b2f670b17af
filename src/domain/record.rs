//! Source records, pages and write-action pairs
//!
//! A [`SourcePage`] is what one scan step returns. The page transformer turns
//! each [`SourceRecord`] into a [`WriteActionPair`]: bulk action metadata
//! followed positionally by the untouched source body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw document as returned by the source cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Index the document was read from
    pub index: String,

    /// Mapping type, absent on typeless clusters
    pub doc_type: Option<String>,

    /// Document id
    pub id: String,

    /// Parent document id for child documents
    pub parent: Option<String>,

    /// Raw `_source` body
    pub source: Value,
}

impl SourceRecord {
    /// Create a record without type or parent
    pub fn new(index: impl Into<String>, id: impl Into<String>, source: Value) -> Self {
        Self {
            index: index.into(),
            doc_type: None,
            id: id.into(),
            parent: None,
            source,
        }
    }

    /// Set the mapping type
    pub fn with_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    /// Set the parent reference
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

/// One page of records returned by a single scan or scroll call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePage {
    /// Records in scan order
    pub records: Vec<SourceRecord>,

    /// Total number of matching documents reported by the cluster
    pub total: u64,
}

impl SourcePage {
    /// Create a page
    pub fn new(records: Vec<SourceRecord>, total: u64) -> Self {
        Self { records, total }
    }

    /// Create a page without records
    pub fn empty(total: u64) -> Self {
        Self {
            records: Vec::new(),
            total,
        }
    }

    /// Number of records in this page
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the page carries no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Id of the last record in the page
    pub fn last_id(&self) -> Option<&str> {
        self.records.last().map(|r| r.id.as_str())
    }
}

/// Bulk action metadata for one document
///
/// Serializes to the classic bulk shape (`_index`, `_type`, `_id`, `parent`).
/// `parent` is only present when the source record carried one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMetadata {
    #[serde(rename = "_index")]
    pub index: String,

    #[serde(rename = "_type", skip_serializing_if = "Option::is_none", default)]
    pub doc_type: Option<String>,

    #[serde(rename = "_id")]
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<String>,
}

/// Action metadata paired with the document body it applies to
#[derive(Debug, Clone, PartialEq)]
pub struct WriteActionPair {
    pub action: ActionMetadata,
    pub body: Value,
}

impl WriteActionPair {
    /// Id of the document this pair writes
    pub fn id(&self) -> &str {
        &self.action.id
    }
}
