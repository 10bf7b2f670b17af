//! Batch writer
//!
//! Submits one transformed page as a single bulk request and classifies the
//! result. Undeliverable requests may be retried with exponential backoff,
//! but the total backoff never exceeds half the scroll keep-alive so the
//! source cursor stays valid while the writer waits.

use crate::adapters::destination::{BulkItemOutcome, BulkWriteResult, DestinationWriter};
use crate::config::{OnWriteFailure, WriteConfig};
use crate::domain::{ClusterError, MigrateError, Result, WriteActionPair};
use crate::log_retry_attempt;
use std::sync::Arc;
use std::time::Duration;

/// Item failures logged individually per page
const MAX_LOGGED_ITEM_FAILURES: usize = 10;

/// Exponential backoff for undeliverable bulk requests
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: usize,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    /// Upper bound on the summed backoff of one page
    pub budget: Duration,
}

impl RetryPolicy {
    /// Build the policy for a scan whose cursor lives for `keep_alive`
    pub fn from_config(config: &WriteConfig, keep_alive: Duration) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay_ms: config.initial_delay_ms,
            max_delay_ms: config.max_delay_ms,
            backoff_multiplier: config.backoff_multiplier,
            budget: keep_alive / 2,
        }
    }

    /// Delay before retry number `attempt` (1-based)
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1) as i32;
        let delay_ms = (self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exponent)) as u64;
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }
}

/// How a page write ended
#[derive(Debug, Clone, PartialEq)]
pub enum WriteStatus {
    /// Every item was accepted
    Written,
    /// The request was delivered but some items were rejected
    PartialFailure { failed: Vec<BulkItemOutcome> },
    /// The request could not be delivered
    TransportFailure { error: ClusterError, attempts: usize },
}

/// Result of one page write
///
/// `attempted` is always the page size, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    pub attempted: usize,
    pub status: WriteStatus,
}

impl WriteOutcome {
    /// Items the destination accepted
    pub fn written(&self) -> usize {
        match &self.status {
            WriteStatus::Written => self.attempted,
            WriteStatus::PartialFailure { failed } => self.attempted.saturating_sub(failed.len()),
            WriteStatus::TransportFailure { .. } => 0,
        }
    }

    /// Items the destination rejected or never received
    pub fn failed(&self) -> usize {
        self.attempted - self.written()
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self.status, WriteStatus::TransportFailure { .. })
    }
}

/// Writes pages to a [`DestinationWriter`]
pub struct BatchWriter {
    destination: Arc<dyn DestinationWriter>,
    retry: RetryPolicy,
    on_transport_failure: OnWriteFailure,
    on_item_failure: OnWriteFailure,
}

impl BatchWriter {
    /// Create a writer with the strategies in `config`
    pub fn new(destination: Arc<dyn DestinationWriter>, config: &WriteConfig, keep_alive: Duration) -> Self {
        Self {
            destination,
            retry: RetryPolicy::from_config(config, keep_alive),
            on_transport_failure: config.on_transport_failure,
            on_item_failure: config.on_item_failure,
        }
    }

    /// Replace the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Submit `pairs` as one bulk request
    ///
    /// Under the `continue` strategies every failure is logged and reported
    /// through the returned [`WriteOutcome`].
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::BulkTransport`] or [`MigrateError::BulkItems`]
    /// only when the matching strategy is `abort`.
    pub async fn write(&self, pairs: &[WriteActionPair]) -> Result<WriteOutcome> {
        let attempted = pairs.len();

        let result = match self.submit(pairs).await {
            Ok(result) => result,
            Err((error, attempts)) => {
                tracing::error!(
                    error = %error,
                    attempts = attempts,
                    batch_size = attempted,
                    first_id = pairs.first().map(WriteActionPair::id).unwrap_or_default(),
                    "Bulk request failed"
                );

                if self.on_transport_failure == OnWriteFailure::Abort {
                    return Err(MigrateError::BulkTransport(error));
                }

                return Ok(WriteOutcome {
                    attempted,
                    status: WriteStatus::TransportFailure { error, attempts },
                });
            }
        };

        if !result.has_failures() {
            tracing::debug!(
                written = attempted,
                took_ms = result.took_ms,
                "Bulk request succeeded"
            );
            return Ok(WriteOutcome {
                attempted,
                status: WriteStatus::Written,
            });
        }

        let failed: Vec<BulkItemOutcome> = result.failures().into_iter().cloned().collect();

        for item in failed.iter().take(MAX_LOGGED_ITEM_FAILURES) {
            tracing::warn!(
                id = %item.id,
                status = item.status,
                error = item.error.as_deref().unwrap_or("-"),
                "Document rejected by destination"
            );
        }
        if failed.len() > MAX_LOGGED_ITEM_FAILURES {
            tracing::warn!(
                more = failed.len() - MAX_LOGGED_ITEM_FAILURES,
                "Further rejected documents not logged"
            );
        }

        tracing::warn!(
            failed = failed.len(),
            total = attempted,
            "Bulk request completed with rejected documents"
        );

        if self.on_item_failure == OnWriteFailure::Abort {
            return Err(MigrateError::BulkItems {
                failed: failed.len(),
                total: attempted,
            });
        }

        Ok(WriteOutcome {
            attempted,
            status: WriteStatus::PartialFailure { failed },
        })
    }

    /// Send the request, retrying transport failures within the budget
    async fn submit(
        &self,
        pairs: &[WriteActionPair],
    ) -> std::result::Result<BulkWriteResult, (ClusterError, usize)> {
        let mut attempt = 0;
        let mut waited = Duration::ZERO;

        loop {
            attempt += 1;
            let error = match self.destination.bulk_write(pairs).await {
                Ok(result) => return Ok(result),
                Err(e) => e,
            };

            if attempt > self.retry.max_retries {
                return Err((error, attempt));
            }

            let delay = self.retry.delay_for(attempt);
            if waited + delay > self.retry.budget {
                tracing::warn!(
                    waited_ms = waited.as_millis() as u64,
                    budget_ms = self.retry.budget.as_millis() as u64,
                    "Retry budget exhausted, giving up on bulk request"
                );
                return Err((error, attempt));
            }

            log_retry_attempt!(attempt, self.retry.max_retries, delay.as_millis() as u64, error);

            tokio::time::sleep(delay).await;
            waited += delay;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActionMetadata;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Destination that replays scripted responses, then succeeds
    struct ScriptedDestination {
        responses: Mutex<VecDeque<std::result::Result<BulkWriteResult, ClusterError>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedDestination {
        fn new(responses: Vec<std::result::Result<BulkWriteResult, ClusterError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(0),
            })
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl DestinationWriter for ScriptedDestination {
        async fn bulk_write(
            &self,
            pairs: &[WriteActionPair],
        ) -> std::result::Result<BulkWriteResult, ClusterError> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(BulkWriteResult::all_succeeded(pairs)))
        }

        fn base_url(&self) -> &str {
            "http://scripted:9200"
        }
    }

    fn pairs(n: usize) -> Vec<WriteActionPair> {
        (0..n)
            .map(|i| WriteActionPair {
                action: ActionMetadata {
                    index: "shop".to_string(),
                    doc_type: None,
                    id: i.to_string(),
                    parent: None,
                },
                body: json!({"n": i}),
            })
            .collect()
    }

    fn unavailable() -> ClusterError {
        ClusterError::ServerError {
            status: 503,
            message: "unavailable".to_string(),
        }
    }

    fn fast_retry(max_retries: usize) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 5,
            backoff_multiplier: 2.0,
            budget: Duration::from_secs(1),
        }
    }

    fn writer(destination: Arc<ScriptedDestination>, config: WriteConfig) -> BatchWriter {
        BatchWriter::new(destination, &config, Duration::from_secs(30))
    }

    #[test]
    fn test_delay_for() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_delay_ms: 500,
            max_delay_ms: 3000,
            backoff_multiplier: 2.0,
            budget: Duration::from_secs(15),
        };

        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(3000));
    }

    #[test]
    fn test_budget_is_half_the_keep_alive() {
        let policy = RetryPolicy::from_config(&WriteConfig::default(), Duration::from_secs(30));
        assert_eq!(policy.budget, Duration::from_secs(15));
        assert_eq!(policy.max_retries, 0);
    }

    #[tokio::test]
    async fn test_write_success() {
        let destination = ScriptedDestination::new(vec![]);
        let outcome = writer(destination.clone(), WriteConfig::default())
            .write(&pairs(3))
            .await
            .unwrap();

        assert_eq!(outcome.status, WriteStatus::Written);
        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.written(), 3);
        assert_eq!(destination.calls(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_continue_reports_attempted() {
        let destination = ScriptedDestination::new(vec![Err(unavailable())]);
        let outcome = writer(destination, WriteConfig::default())
            .write(&pairs(4))
            .await
            .unwrap();

        assert!(outcome.is_transport_failure());
        assert_eq!(outcome.attempted, 4);
        assert_eq!(outcome.written(), 0);
        assert_eq!(outcome.failed(), 4);
    }

    #[tokio::test]
    async fn test_transport_failure_abort() {
        let destination = ScriptedDestination::new(vec![Err(unavailable())]);
        let config = WriteConfig {
            on_transport_failure: OnWriteFailure::Abort,
            ..Default::default()
        };

        let err = writer(destination, config).write(&pairs(2)).await.unwrap_err();
        assert!(matches!(err, MigrateError::BulkTransport(_)));
        assert_eq!(err.exit_code(), 3);
    }

    #[tokio::test]
    async fn test_retry_recovers() {
        let destination = ScriptedDestination::new(vec![Err(unavailable()), Err(unavailable())]);
        let outcome = writer(destination.clone(), WriteConfig::default())
            .with_retry(fast_retry(3))
            .write(&pairs(2))
            .await
            .unwrap();

        assert_eq!(outcome.status, WriteStatus::Written);
        assert_eq!(destination.calls(), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_retries() {
        let destination = ScriptedDestination::new(vec![
            Err(unavailable()),
            Err(unavailable()),
            Err(unavailable()),
        ]);
        let outcome = writer(destination.clone(), WriteConfig::default())
            .with_retry(fast_retry(1))
            .write(&pairs(2))
            .await
            .unwrap();

        match outcome.status {
            WriteStatus::TransportFailure { attempts, .. } => assert_eq!(attempts, 2),
            other => panic!("unexpected status: {other:?}"),
        }
        assert_eq!(destination.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_stops_at_budget() {
        let destination = ScriptedDestination::new(vec![Err(unavailable()), Err(unavailable())]);
        let policy = RetryPolicy {
            budget: Duration::from_millis(1),
            initial_delay_ms: 10,
            max_delay_ms: 10,
            ..fast_retry(5)
        };

        let outcome = writer(destination.clone(), WriteConfig::default())
            .with_retry(policy)
            .write(&pairs(1))
            .await
            .unwrap();

        assert!(outcome.is_transport_failure());
        assert_eq!(destination.calls(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure() {
        let mut result = BulkWriteResult::all_succeeded(&pairs(3));
        result.items[1].status = 400;
        result.items[1].error = Some("mapper_parsing_exception: failed to parse".to_string());

        let destination = ScriptedDestination::new(vec![Ok(result.clone())]);
        let outcome = writer(destination, WriteConfig::default())
            .write(&pairs(3))
            .await
            .unwrap();

        assert_eq!(outcome.written(), 2);
        assert_eq!(outcome.failed(), 1);
        match outcome.status {
            WriteStatus::PartialFailure { failed } => assert_eq!(failed[0].id, "1"),
            other => panic!("unexpected status: {other:?}"),
        }

        let destination = ScriptedDestination::new(vec![Ok(result)]);
        let config = WriteConfig {
            on_item_failure: OnWriteFailure::Abort,
            ..Default::default()
        };
        let err = writer(destination, config).write(&pairs(3)).await.unwrap_err();
        assert!(matches!(err, MigrateError::BulkItems { failed: 1, total: 3 }));
    }
}
