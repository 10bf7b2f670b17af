//! Migration coordinator - the scan, transform, write, record loop
//!
//! One page is in flight at a time. The coordinator owns the cursor and the
//! progress state, and honours the shutdown signal while waiting for a page
//! and while waiting for a write.

use super::batch::{BatchWriter, WriteOutcome};
use super::summary::MigrationSummary;
use crate::adapters::destination::{DestinationWriter, DryRunDestination, ElasticsearchDestination};
use crate::adapters::source::{ElasticsearchSource, SourceReader};
use crate::config::MigrationConfig;
use crate::core::scan::CursorController;
use crate::core::state::{ProgressState, ProgressTracker};
use crate::core::transform::transform_page;
use crate::domain::{Result, ScanCursor, SourcePage, WriteActionPair};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Resolves once shutdown has been requested
///
/// A dropped sender means nobody can request shutdown any more, so the
/// future then never resolves.
async fn shutdown_requested(signal: &mut watch::Receiver<bool>) {
    loop {
        if *signal.borrow_and_update() {
            return;
        }
        if signal.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Migration coordinator
///
/// # Example
///
/// ```rust,no_run
/// use esmigrate::config::load_config;
/// use esmigrate::core::migration::MigrationCoordinator;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config("esmigrate.toml")?;
/// let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
///
/// let coordinator = MigrationCoordinator::from_config(&config, shutdown_rx)?;
/// let summary = coordinator.run().await?;
///
/// println!("Processed {} of {:?}", summary.processed, summary.total);
/// # Ok(())
/// # }
/// ```
pub struct MigrationCoordinator {
    controller: CursorController,
    writer: BatchWriter,
    tracker: ProgressTracker,
    shutdown: watch::Receiver<bool>,
    dry_run: bool,
}

impl MigrationCoordinator {
    /// Create a coordinator over explicit source and destination handles
    pub fn new(
        config: &MigrationConfig,
        source: Arc<dyn SourceReader>,
        destination: Arc<dyn DestinationWriter>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let keep_alive = config.scan.scroll_timeout.duration();

        Self {
            controller: CursorController::new(source, &config.scan),
            writer: BatchWriter::new(destination, &config.write, keep_alive),
            tracker: ProgressTracker::new(config.progress.termination).with_skip(config.scan.skip),
            shutdown,
            dry_run: config.write.dry_run,
        }
    }

    /// Create a coordinator talking HTTP to the configured clusters
    ///
    /// With `write.dry_run` set the destination is never contacted.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if an HTTP client cannot be built.
    pub fn from_config(config: &MigrationConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let source: Arc<dyn SourceReader> = Arc::new(ElasticsearchSource::new(&config.source)?);

        let destination: Arc<dyn DestinationWriter> = if config.write.dry_run {
            Arc::new(DryRunDestination::new(config.destination.base_url()))
        } else {
            Arc::new(ElasticsearchDestination::new(&config.destination)?)
        };

        Ok(Self::new(config, source, destination, shutdown))
    }

    /// Replace the batch writer, e.g. to tune retries
    pub fn with_writer(mut self, writer: BatchWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Run the migration to completion, interruption or the first fatal error
    ///
    /// Each iteration writes the current page (empty pages are not sent),
    /// records it whatever the write outcome, and either stops or requests
    /// the next page. Write failures never stop the loop unless their
    /// strategy is `abort`.
    ///
    /// # Errors
    ///
    /// Returns the scan error that ended the run, or a bulk error under an
    /// `abort` strategy. An open scroll is released before returning.
    pub async fn run(mut self) -> Result<MigrationSummary> {
        let start = Instant::now();
        let mut summary = MigrationSummary {
            dry_run: self.dry_run,
            ..MigrationSummary::new()
        };

        let opened = tokio::select! {
            biased;
            _ = shutdown_requested(&mut self.shutdown) => None,
            result = self.controller.open_scan() => Some(result),
        };

        let (mut cursor, mut page) = match opened {
            Some(Ok(step)) => step,
            Some(Err(e)) => {
                tracing::error!(error = %e, "Scan could not be opened");
                return Err(e);
            }
            None => {
                tracing::warn!("Shutdown requested before the scan was opened");
                summary.interrupted = true;
                return Ok(self.finish(summary, &ProgressState::default(), start));
            }
        };

        let mut state = ProgressState::default();

        loop {
            let total = page.total;
            let page_size = page.len();
            let last_id = page.last_id().map(String::from);

            if page_size == 0 {
                tracing::debug!(
                    processed = state.processed,
                    total = total,
                    "Empty page, requesting the next one"
                );
                tokio::task::yield_now().await;
            } else {
                let pairs = transform_page(page);
                match self.write_page(&pairs).await {
                    Some(Ok(outcome)) => summary.add_write(&outcome),
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "Aborting migration after write failure");
                        summary.apply_progress(&state);
                        self.controller.release(&cursor).await;
                        return Err(e);
                    }
                    None => {
                        summary.interrupted = true;
                        break;
                    }
                }
            }

            state = self
                .tracker
                .record(state, total, page_size, last_id.as_deref());

            if self.tracker.is_complete(&state) {
                summary.complete = true;
                break;
            }

            match self.next_page(&cursor).await {
                Some(Ok((next_cursor, next_page))) => {
                    cursor = next_cursor;
                    page = next_page;
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, processed = state.processed, "Scan could not be advanced");
                    self.controller.release(&cursor).await;
                    return Err(e);
                }
                None => {
                    summary.interrupted = true;
                    break;
                }
            }
        }

        if summary.interrupted {
            tracing::warn!(
                processed = state.processed,
                "Shutdown requested, migration stopped"
            );
        }

        self.controller.release(&cursor).await;
        Ok(self.finish(summary, &state, start))
    }

    /// Await the write, or `None` if shutdown wins
    async fn write_page(&mut self, pairs: &[WriteActionPair]) -> Option<Result<WriteOutcome>> {
        tokio::select! {
            biased;
            _ = shutdown_requested(&mut self.shutdown) => None,
            result = self.writer.write(pairs) => Some(result),
        }
    }

    /// Await the next page, or `None` if shutdown wins
    async fn next_page(&mut self, cursor: &ScanCursor) -> Option<Result<(ScanCursor, SourcePage)>> {
        tokio::select! {
            biased;
            _ = shutdown_requested(&mut self.shutdown) => None,
            result = self.controller.advance(cursor) => Some(result),
        }
    }

    fn finish(&self, mut summary: MigrationSummary, state: &ProgressState, start: Instant) -> MigrationSummary {
        summary.apply_progress(state);
        let summary = summary.with_duration(start.elapsed());
        summary.log_summary();
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_requested_resolves_when_already_set() {
        let (_tx, mut rx) = watch::channel(true);
        shutdown_requested(&mut rx).await;
    }

    #[tokio::test]
    async fn test_shutdown_requested_waits_for_signal() {
        let (tx, mut rx) = watch::channel(false);

        let waiter = tokio::spawn(async move {
            shutdown_requested(&mut rx).await;
        });

        tx.send(true).unwrap();
        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_requested_pends_after_sender_drop() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            shutdown_requested(&mut rx),
        )
        .await;
        assert!(result.is_err());
    }
}
