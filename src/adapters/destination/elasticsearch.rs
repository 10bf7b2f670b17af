//! Elasticsearch bulk writer

use super::models::BulkResponse;
use super::traits::{BulkWriteResult, DestinationWriter};
use crate::adapters::http::{build_client, decode, read_body, transport_error};
use crate::config::ClusterConfig;
use crate::domain::{ClusterError, ClusterVersion, Result, WriteActionPair};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};

/// Bulk writer for an Elasticsearch cluster
///
/// Each pair becomes two NDJSON lines: `{"index": <metadata>}` followed by
/// the document body. Typeless clusters (7.x and later) get no `_type` and
/// receive the parent id as `routing`.
pub struct ElasticsearchDestination {
    base_url: String,
    version: ClusterVersion,
    client: Client,
}

impl ElasticsearchDestination {
    /// Create a writer for the cluster described by `config`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &ClusterConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url(),
            version: config.version,
            client: build_client(config)?,
        })
    }

    fn action_line(&self, pair: &WriteActionPair) -> Value {
        let action = &pair.action;
        let mut meta = Map::new();
        meta.insert("_index".to_string(), json!(action.index));

        if !self.version.is_typeless() {
            if let Some(doc_type) = &action.doc_type {
                meta.insert("_type".to_string(), json!(doc_type));
            }
        }

        meta.insert("_id".to_string(), json!(action.id));

        if let Some(parent) = &action.parent {
            let key = if self.version.is_typeless() {
                "routing"
            } else {
                "parent"
            };
            meta.insert(key.to_string(), json!(parent));
        }

        json!({ "index": meta })
    }

    /// Render the NDJSON request body
    fn bulk_body(&self, pairs: &[WriteActionPair]) -> String {
        let mut body = String::new();
        for pair in pairs {
            body.push_str(&self.action_line(pair).to_string());
            body.push('\n');
            body.push_str(&pair.body.to_string());
            body.push('\n');
        }
        body
    }
}

#[async_trait]
impl DestinationWriter for ElasticsearchDestination {
    async fn bulk_write(
        &self,
        pairs: &[WriteActionPair],
    ) -> std::result::Result<BulkWriteResult, ClusterError> {
        let url = format!("{}/_bulk", self.base_url);

        tracing::debug!(url = %url, actions = pairs.len(), "Submitting bulk request");

        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/x-ndjson")
            .body(self.bulk_body(pairs))
            .send()
            .await
            .map_err(transport_error)?;

        let text = read_body(resp).await?;
        let response: BulkResponse = decode(&text)?;
        Ok(response.into_result())
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
