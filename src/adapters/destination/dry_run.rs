//! Destination that logs bulk requests instead of sending them

use super::traits::{BulkWriteResult, DestinationWriter};
use crate::domain::{ClusterError, WriteActionPair};
use async_trait::async_trait;

/// Writer used for `--dry-run`
///
/// Every pair is reported as accepted so progress and termination behave as
/// in a real run. The source cluster is still scrolled.
pub struct DryRunDestination {
    base_url: String,
}

impl DryRunDestination {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DestinationWriter for DryRunDestination {
    async fn bulk_write(&self, pairs: &[WriteActionPair]) -> Result<BulkWriteResult, ClusterError> {
        tracing::info!(
            destination = %self.base_url,
            count = pairs.len(),
            first_id = pairs.first().map(WriteActionPair::id).unwrap_or_default(),
            last_id = pairs.last().map(WriteActionPair::id).unwrap_or_default(),
            "DRY RUN: Would index {} documents",
            pairs.len()
        );
        Ok(BulkWriteResult::all_succeeded(pairs))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
