//! Source reader trait definition
//!
//! This module defines the `SourceReader` trait that abstracts the cluster a
//! migration reads from. The migration core only ever talks to this trait, so
//! scripted readers can stand in for a real cluster in tests.

use crate::config::ScanConfig;
use crate::domain::{ClusterError, ScanCursor, ScrollTimeout, SourcePage};
use async_trait::async_trait;
use serde_json::Value;

/// A cursor together with the page it was returned with
pub type ScanStep = (ScanCursor, SourcePage);

/// Parameters of the initial scan request
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRequest {
    /// Index to scan
    pub index: String,

    /// Mapping type to restrict the scan to
    pub doc_type: Option<String>,

    /// Query body
    pub query: Value,

    /// Sort specification
    pub sort: Value,

    /// Page size
    pub size: usize,

    /// Documents to skip
    pub skip: u64,

    /// Scroll keep-alive
    pub scroll_timeout: ScrollTimeout,
}

impl ScanRequest {
    /// Build the request from the scan section of the configuration
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            index: config.index.clone(),
            doc_type: config.doc_type.clone(),
            query: config.query.clone(),
            sort: config.sort.clone(),
            size: config.batch_size,
            skip: config.skip,
            scroll_timeout: config.scroll_timeout.clone(),
        }
    }
}

/// Trait for clusters documents are scanned from
///
/// Implementations must request every stored field plus the raw source, and
/// report for every page the records (index, type, id, optional parent,
/// source body) together with the total match count.
#[async_trait]
pub trait SourceReader: Send + Sync {
    /// Issue the initial scan request
    ///
    /// # Errors
    ///
    /// Returns an error if the cluster rejects the request or cannot be reached.
    async fn open_scan(&self, request: &ScanRequest) -> Result<ScanStep, ClusterError>;

    /// Request the next page for `cursor`
    ///
    /// The returned cursor replaces the one passed in, even when the token is
    /// unchanged. The page may be empty.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::CursorExpired`] when the cluster no longer knows
    /// the scroll, or a transport error.
    async fn advance(&self, cursor: &ScanCursor) -> Result<ScanStep, ClusterError>;

    /// Release the server-side scroll context
    ///
    /// Releasing an already expired scroll is not an error.
    async fn release(&self, cursor: &ScanCursor) -> Result<(), ClusterError>;

    /// Base URL of the cluster
    fn base_url(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_request_from_config() {
        let config = ScanConfig {
            index: "products".to_string(),
            doc_type: Some("product".to_string()),
            batch_size: 200,
            skip: 50,
            ..Default::default()
        };

        let request = ScanRequest::from_config(&config);

        assert_eq!(request.index, "products");
        assert_eq!(request.doc_type.as_deref(), Some("product"));
        assert_eq!(request.size, 200);
        assert_eq!(request.skip, 50);
        assert_eq!(request.scroll_timeout.as_str(), "30s");
        assert_eq!(request.query, serde_json::json!({"match_all": {}}));
    }
}
