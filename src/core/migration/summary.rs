//! Migration summary and reporting

use super::batch::WriteOutcome;
use crate::core::state::ProgressState;
use std::time::Duration;

/// Summary of a migration run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationSummary {
    /// Pages recorded, including empty ones
    pub pages: u64,

    /// Records counted as processed
    pub processed: u64,

    /// Total reported by the first page
    pub total: Option<u64>,

    /// Documents accepted by the destination
    pub written: u64,

    /// Documents rejected by the destination or never delivered
    pub failed: u64,

    /// Pages whose bulk request could not be delivered
    pub transport_failures: u64,

    /// Id of the last record handled
    pub last_record_id: Option<String>,

    /// Duration of the run
    pub duration: Duration,

    /// The run ended because the progress tracker reported completion
    pub complete: bool,

    /// The run was stopped by a shutdown signal
    pub interrupted: bool,

    /// Writes were simulated
    pub dry_run: bool,
}

impl MigrationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the outcome of one page write
    pub fn add_write(&mut self, outcome: &WriteOutcome) {
        self.written += outcome.written() as u64;
        self.failed += outcome.failed() as u64;
        if outcome.is_transport_failure() {
            self.transport_failures += 1;
        }
    }

    /// Copy the final progress counters
    pub fn apply_progress(&mut self, state: &ProgressState) {
        self.pages = state.pages;
        self.processed = state.processed;
        self.total = state.total;
        self.last_record_id = state.last_record_id.clone();
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Complete with every document written
    pub fn is_successful(&self) -> bool {
        self.complete && self.failed == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            pages = self.pages,
            processed = self.processed,
            total = ?self.total,
            written = self.written,
            failed = self.failed,
            transport_failures = self.transport_failures,
            last_id = self.last_record_id.as_deref().unwrap_or("-"),
            duration_secs = self.duration.as_secs_f64(),
            complete = self.complete,
            interrupted = self.interrupted,
            dry_run = self.dry_run,
            "Migration finished"
        );

        if self.failed > 0 {
            tracing::warn!(
                failed = self.failed,
                transport_failures = self.transport_failures,
                "Some documents were not written to the destination"
            );
        }
    }
}
