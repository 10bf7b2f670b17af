//! Elasticsearch scroll reader
//!
//! Speaks the scan/scroll dialect of the configured cluster version:
//! `search_type=scan` and mapping types in the URL before 5.x and 7.x
//! respectively, `fields` vs `stored_fields` for stored field retrieval, and
//! the pre-2.x raw scroll-id continuation body.

use super::models::SearchResponse;
use super::traits::{ScanRequest, ScanStep, SourceReader};
use crate::adapters::http::{build_client, decode, read_body, transport_error};
use crate::config::ClusterConfig;
use crate::domain::{ClusterError, ClusterVersion, Result, ScanCursor, ScrollTimeout};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};

/// Markers the cluster uses when a scroll id is unknown or expired
const EXPIRED_MARKERS: [&str; 2] = ["search_context_missing_exception", "No search context found"];

/// Scroll reader for an Elasticsearch cluster
///
/// # Example
///
/// ```no_run
/// use esmigrate::adapters::source::{ElasticsearchSource, ScanRequest, SourceReader};
/// use esmigrate::config::{ClusterConfig, ScanConfig};
///
/// # async fn example() -> esmigrate::domain::Result<()> {
/// let config = ClusterConfig {
///     host: "http://old-cluster:9200".to_string(),
///     ..Default::default()
/// };
/// let source = ElasticsearchSource::new(&config)?;
///
/// let scan = ScanConfig {
///     index: "products".to_string(),
///     ..Default::default()
/// };
/// let (cursor, page) = source.open_scan(&ScanRequest::from_config(&scan)).await?;
/// println!("{} documents match, first page has {}", page.total, page.len());
/// source.release(&cursor).await?;
/// # Ok(())
/// # }
/// ```
pub struct ElasticsearchSource {
    base_url: String,
    version: ClusterVersion,
    client: Client,
}

impl ElasticsearchSource {
    /// Create a reader for the cluster described by `config`
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

    fn search_url(&self, request: &ScanRequest) -> String {
        let mut url = format!("{}/{}", self.base_url, request.index);

        if !self.version.is_typeless() {
            if let Some(doc_type) = &request.doc_type {
                url.push('/');
                url.push_str(doc_type);
            }
        }

        url.push_str("/_search?scroll=");
        url.push_str(request.scroll_timeout.as_str());

        if self.version.supports_scan_search_type() {
            url.push_str("&search_type=scan");
        }

        url
    }

    fn search_body(&self, request: &ScanRequest) -> Value {
        let mut body = Map::new();
        body.insert("size".to_string(), json!(request.size));
        body.insert("from".to_string(), json!(request.skip));
        body.insert("query".to_string(), request.query.clone());
        body.insert("sort".to_string(), request.sort.clone());

        if self.version.major < 5 {
            body.insert("fields".to_string(), json!(["_source", "*"]));
        } else {
            body.insert("stored_fields".to_string(), json!(["*"]));
            body.insert("_source".to_string(), json!(true));
        }

        if self.version.major >= 7 {
            body.insert("track_total_hits".to_string(), json!(true));
        }

        Value::Object(body)
    }

    fn step(&self, body: &str, keep_alive: &ScrollTimeout) -> std::result::Result<ScanStep, ClusterError> {
        let response: SearchResponse = decode(body)?;
        let (scroll_id, page) = response.into_step()?;
        Ok((ScanCursor::new(scroll_id, keep_alive.clone()), page))
    }
}

/// Reclassify errors that mean the scroll context is gone
fn classify_scroll_error(err: ClusterError) -> ClusterError {
    match err {
        ClusterError::ClientError { status: 404, message } => ClusterError::CursorExpired(message),
        ClusterError::ClientError { message, .. } | ClusterError::ServerError { message, .. }
            if EXPIRED_MARKERS.iter().any(|m| message.contains(m)) =>
        {
            ClusterError::CursorExpired(message)
        }
        other => other,
    }
}

#[async_trait]
impl SourceReader for ElasticsearchSource {
    async fn open_scan(&self, request: &ScanRequest) -> std::result::Result<ScanStep, ClusterError> {
        let url = self.search_url(request);
        let body = self.search_body(request);

        tracing::debug!(url = %url, body = %body, "Opening scroll");

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let text = read_body(resp).await?;
        self.step(&text, &request.scroll_timeout)
    }

    async fn advance(&self, cursor: &ScanCursor) -> std::result::Result<ScanStep, ClusterError> {
        let keep_alive = cursor.keep_alive();

        let request = if self.version.major < 2 {
            // 1.x takes the raw scroll id as the body
            self.client
                .post(format!(
                    "{}/_search/scroll?scroll={}",
                    self.base_url,
                    keep_alive.as_str()
                ))
                .body(cursor.token().to_string())
        } else {
            self.client
                .post(format!("{}/_search/scroll", self.base_url))
                .json(&json!({
                    "scroll": keep_alive.as_str(),
                    "scroll_id": cursor.token(),
                }))
        };

        let resp = request.send().await.map_err(transport_error)?;
        let text = read_body(resp).await.map_err(classify_scroll_error)?;
        self.step(&text, keep_alive)
    }

    async fn release(&self, cursor: &ScanCursor) -> std::result::Result<(), ClusterError> {
        let resp = self
            .client
            .delete(format!("{}/_search/scroll", self.base_url))
            .json(&json!({ "scroll_id": [cursor.token()] }))
            .send()
            .await
            .map_err(transport_error)?;

        match read_body(resp).await {
            Ok(_) => Ok(()),
            Err(ClusterError::ClientError { status: 404, .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
