//! Domain error types
//!
//! This module defines the error hierarchy for esmigrate. Transport adapters
//! report [`ClusterError`]; the migration core wraps those into
//! [`MigrateError`] variants that say which stage of the run failed.
//! Third-party client types never leak through these enums.

use thiserror::Error;

/// Main esmigrate error type
///
/// Only the scan variants and [`MigrateError::Configuration`] are fatal under
/// the default write strategy. Bulk variants surface only when a write
/// strategy is set to `abort`.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Missing or invalid configuration, raised before any network activity
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The initial scan request was rejected by the source cluster
    #[error("Failed to open scan on index '{index}': {source}")]
    ScanOpen {
        index: String,
        #[source]
        source: ClusterError,
    },

    /// A scroll continuation failed (transport failure or expired cursor)
    #[error("Failed to advance scan at page {page_index} (cursor age {cursor_age_ms} ms): {source}")]
    ScanAdvance {
        page_index: u64,
        cursor_age_ms: u128,
        #[source]
        source: ClusterError,
    },

    /// The bulk request could not be delivered to the destination
    #[error("Bulk request could not be delivered: {0}")]
    BulkTransport(#[source] ClusterError),

    /// The bulk request was delivered but items were rejected
    #[error("Bulk request rejected {failed} of {total} items")]
    BulkItems { failed: usize, total: usize },

    /// Generic cluster errors outside of a specific migration stage
    #[error("Cluster error: {0}")]
    Cluster(#[from] ClusterError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl MigrateError {
    /// Process exit code for this error
    ///
    /// 2 = configuration, 3 = write aborted by strategy, 4 = scan could not be
    /// opened, 5 = any other fatal error.
    pub fn exit_code(&self) -> i32 {
        match self {
            MigrateError::Configuration(_) => 2,
            MigrateError::BulkTransport(_) | MigrateError::BulkItems { .. } => 3,
            MigrateError::ScanOpen { .. } => 4,
            _ => 5,
        }
    }
}

/// Errors reported by the source and destination transports
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClusterError {
    /// The cluster could not be reached
    #[error("Failed to connect to cluster: {0}")]
    ConnectionFailed(String),

    /// The request did not complete in time
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Client error (4xx), e.g. a malformed query or missing index
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// The response body did not have the expected shape
    #[error("Invalid response from cluster: {0}")]
    InvalidResponse(String),

    /// The scroll id is no longer known to the cluster
    #[error("Scroll cursor expired or invalid: {0}")]
    CursorExpired(String),
}

impl ClusterError {
    /// Classify a non-success HTTP status into a cluster error
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status >= 500 {
            ClusterError::ServerError { status, message }
        } else {
            ClusterError::ClientError { status, message }
        }
    }
}

impl From<std::io::Error> for MigrateError {
    fn from(err: std::io::Error) -> Self {
        MigrateError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MigrateError {
    fn from(err: serde_json::Error) -> Self {
        MigrateError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for MigrateError {
    fn from(err: toml::de::Error) -> Self {
        MigrateError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = MigrateError::Configuration("source.host is required".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: source.host is required"
        );
    }

    #[test]
    fn test_scan_advance_display_carries_context() {
        let err = MigrateError::ScanAdvance {
            page_index: 7,
            cursor_age_ms: 31_000,
            source: ClusterError::CursorExpired("No search context found".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("page 7"));
        assert!(message.contains("31000 ms"));
        assert!(message.contains("No search context found"));
    }

    #[test]
    fn test_scan_error_exposes_source() {
        use std::error::Error as _;

        let err = MigrateError::ScanOpen {
            index: "products".to_string(),
            source: ClusterError::ConnectionFailed("refused".to_string()),
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(MigrateError::Configuration(String::new()).exit_code(), 2);
        assert_eq!(
            MigrateError::BulkItems {
                failed: 1,
                total: 2
            }
            .exit_code(),
            3
        );
        assert_eq!(
            MigrateError::ScanOpen {
                index: "i".to_string(),
                source: ClusterError::Timeout("t".to_string()),
            }
            .exit_code(),
            4
        );
        assert_eq!(
            MigrateError::ScanAdvance {
                page_index: 0,
                cursor_age_ms: 0,
                source: ClusterError::Timeout("t".to_string()),
            }
            .exit_code(),
            5
        );
    }

    #[test]
    fn test_cluster_error_from_status() {
        assert!(matches!(
            ClusterError::from_status(503, "unavailable"),
            ClusterError::ServerError { status: 503, .. }
        ));
        assert!(matches!(
            ClusterError::from_status(400, "bad query"),
            ClusterError::ClientError { status: 400, .. }
        ));
    }

    #[test]
    fn test_cluster_error_conversion() {
        let err: MigrateError = ClusterError::Timeout("60s".to_string()).into();
        assert!(matches!(err, MigrateError::Cluster(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: MigrateError = json_err.into();
        assert!(matches!(err, MigrateError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: MigrateError = toml_err.into();
        assert!(matches!(err, MigrateError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: MigrateError = io_err.into();
        assert!(matches!(err, MigrateError::Io(_)));
    }
}
