//! Destination writer trait definition
//!
//! This module defines the trait that destination adapters must implement
//! to receive bulk index requests from a migration.

use crate::domain::{ClusterError, WriteActionPair};
use async_trait::async_trait;

/// Result of a delivered bulk request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkWriteResult {
    /// Time the cluster reports spending on the request
    pub took_ms: u64,

    /// Per-document outcomes, in request order
    pub items: Vec<BulkItemOutcome>,
}

/// Outcome of one action in a bulk request
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemOutcome {
    /// Document id the action targeted
    pub id: String,

    /// Per-item HTTP status
    pub status: u16,

    /// Error description when the item was rejected
    pub error: Option<String>,
}

impl BulkItemOutcome {
    /// Whether the item was accepted
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}

impl BulkWriteResult {
    /// Build a result where every pair was accepted
    pub fn all_succeeded(pairs: &[WriteActionPair]) -> Self {
        Self {
            took_ms: 0,
            items: pairs
                .iter()
                .map(|pair| BulkItemOutcome {
                    id: pair.id().to_string(),
                    status: 201,
                    error: None,
                })
                .collect(),
        }
    }

    /// Number of accepted items
    pub fn success_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_success()).count()
    }

    /// Items the cluster rejected
    pub fn failures(&self) -> Vec<&BulkItemOutcome> {
        self.items.iter().filter(|item| !item.is_success()).collect()
    }

    /// Whether any item was rejected
    pub fn has_failures(&self) -> bool {
        self.items.iter().any(|item| !item.is_success())
    }
}

/// Trait for clusters documents are written to
///
/// A call is one bulk request. Transport failures (the request could not be
/// delivered, or the cluster rejected it as a whole) are returned as `Err`;
/// per-item rejections come back inside the `Ok` result.
#[async_trait]
pub trait DestinationWriter: Send + Sync {
    /// Submit index actions for `pairs` in one bulk request
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be delivered.
    async fn bulk_write(&self, pairs: &[WriteActionPair]) -> Result<BulkWriteResult, ClusterError>;

    /// Base URL of the cluster
    fn base_url(&self) -> &str;
}
