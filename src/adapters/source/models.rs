//! Search and scroll response models

use crate::domain::{ClusterError, SourcePage, SourceRecord};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Body of a search or scroll response
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "_scroll_id")]
    pub scroll_id: Option<String>,

    pub hits: Hits,
}

/// `hits` section of a search response
#[derive(Debug, Deserialize)]
pub struct Hits {
    pub total: TotalHits,

    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// `hits.total`, a number before 7.0 and an object afterwards
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    pub fn value(&self) -> u64 {
        match self {
            TotalHits::Count(count) => *count,
            TotalHits::Object { value } => *value,
        }
    }
}

/// One search hit
#[derive(Debug, Deserialize)]
pub struct Hit {
    #[serde(rename = "_index")]
    pub index: String,

    #[serde(rename = "_type", default)]
    pub doc_type: Option<String>,

    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_source", default)]
    pub source: Value,

    #[serde(default)]
    pub fields: Option<Map<String, Value>>,

    #[serde(rename = "_parent", default)]
    pub parent: Option<String>,
}

impl Hit {
    /// Parent id from `fields._parent` (string or single-element array) or the
    /// hit-level `_parent`
    ///
    /// Custom `_routing` is not a parent reference and is ignored.
    fn parent_reference(&self) -> Option<String> {
        let from_fields = self
            .fields
            .as_ref()
            .and_then(|fields| fields.get("_parent"))
            .and_then(|value| match value {
                Value::String(s) => Some(s.clone()),
                Value::Array(values) => values.first().and_then(|v| v.as_str()).map(String::from),
                _ => None,
            });

        from_fields.or_else(|| self.parent.clone())
    }

    fn into_record(self) -> SourceRecord {
        let parent = self.parent_reference();
        SourceRecord {
            index: self.index,
            doc_type: self.doc_type,
            id: self.id,
            parent,
            source: self.source,
        }
    }
}

impl SearchResponse {
    /// Split the response into scroll id and page
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidResponse`] if the response carries no scroll id.
    pub fn into_step(self) -> Result<(String, SourcePage), ClusterError> {
        let scroll_id = self.scroll_id.ok_or_else(|| {
            ClusterError::InvalidResponse("Response does not contain a _scroll_id".to_string())
        })?;

        let total = self.hits.total.value();
        let records = self.hits.hits.into_iter().map(Hit::into_record).collect();

        Ok((scroll_id, SourcePage::new(records, total)))
    }
}
