//! Shared HTTP plumbing for the Elasticsearch adapters

use crate::config::ClusterConfig;
use crate::domain::{ClusterError, MigrateError, Result};
use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build an HTTP client for one cluster
///
/// # Errors
///
/// Returns [`MigrateError::Configuration`] if the TLS backend cannot be initialised.
pub fn build_client(config: &ClusterConfig) -> Result<Client> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(config.request_timeout_seconds))
        .connect_timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| MigrateError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Map a reqwest failure to a transport error without exposing reqwest types
pub(crate) fn transport_error(err: reqwest::Error) -> ClusterError {
    if err.is_timeout() {
        ClusterError::Timeout(err.to_string())
    } else {
        ClusterError::ConnectionFailed(err.to_string())
    }
}

/// Read a response body, failing on non-success status codes
pub(crate) async fn read_body(resp: Response) -> std::result::Result<String, ClusterError> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(ClusterError::from_status(status.as_u16(), body));
    }

    Ok(body)
}

/// Decode a JSON body into `T`
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> std::result::Result<T, ClusterError> {
    serde_json::from_str(body).map_err(|e| ClusterError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client() {
        let config = ClusterConfig {
            host: "localhost:9200".to_string(),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn test_decode_invalid_json() {
        let result: std::result::Result<serde_json::Value, _> = decode("{not json");
        assert!(matches!(result, Err(ClusterError::InvalidResponse(_))));
    }
}
