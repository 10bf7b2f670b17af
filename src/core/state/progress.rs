//! Progress tracking
//!
//! [`ProgressState`] is a plain value: the coordinator hands it to
//! [`ProgressTracker::record`] after every page and gets the updated state
//! back. Nothing else holds or mutates it.

use crate::config::TerminationPolicy;
use crate::log_page_progress;

/// Consecutive empty pages after which a scroll that has returned records
/// counts as drained under [`TerminationPolicy::Exhaustion`]
pub const DRAINED_AFTER_EMPTY_PAGES: u32 = 3;

/// Counters for one migration run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    /// Records handled so far, whatever the write outcome
    pub processed: u64,

    /// Total match count, fixed by the first page
    pub total: Option<u64>,

    /// Id of the last record of the most recent non-empty page
    pub last_record_id: Option<String>,

    /// Size of the most recently recorded page
    pub last_page_size: usize,

    /// Pages recorded, including empty ones
    pub pages: u64,

    /// Consecutive empty pages, reset by any non-empty page
    pub empty_streak: u32,
}

impl ProgressState {
    /// Account for one page
    ///
    /// `total` is only taken from the first page; later values are ignored.
    pub fn record(mut self, total: u64, page_size: usize, last_id: Option<&str>) -> Self {
        if self.total.is_none() {
            self.total = Some(total);
        }
        self.processed += page_size as u64;
        self.last_page_size = page_size;
        self.pages += 1;
        self.empty_streak = if page_size == 0 { self.empty_streak + 1 } else { 0 };
        if let Some(id) = last_id {
            self.last_record_id = Some(id.to_string());
        }
        self
    }

    /// Whether the run is finished under `policy`
    ///
    /// `skip` is the number of documents the scan skipped, so the source can
    /// only ever deliver `total - skip` records. `Strict` ignores it.
    pub fn is_complete(&self, policy: TerminationPolicy, skip: u64) -> bool {
        let Some(total) = self.total else {
            return false;
        };

        match policy {
            TerminationPolicy::Strict => self.processed == total,
            TerminationPolicy::Exhaustion => {
                let expected = total.saturating_sub(skip);
                self.processed == expected
                    || (self.processed > expected && self.last_page_size == 0)
                    || (self.processed > 0 && self.empty_streak >= DRAINED_AFTER_EMPTY_PAGES)
            }
        }
    }
}

/// Applies the termination policy and emits the per-page progress line
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressTracker {
    policy: TerminationPolicy,
    skip: u64,
}

impl ProgressTracker {
    pub fn new(policy: TerminationPolicy) -> Self {
        Self { policy, skip: 0 }
    }

    /// Account for documents skipped at the start of the scan
    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = skip;
        self
    }

    pub fn policy(&self) -> TerminationPolicy {
        self.policy
    }

    /// Record one page and log progress
    pub fn record(
        &self,
        state: ProgressState,
        total: u64,
        page_size: usize,
        last_id: Option<&str>,
    ) -> ProgressState {
        let state = state.record(total, page_size, last_id);

        let fixed_total = state.total;
        let latest_id = state.last_record_id.as_deref();
        log_page_progress!(state.processed, fixed_total, latest_id);

        if let Some(total) = state.total {
            if state.processed > total {
                tracing::warn!(
                    processed = state.processed,
                    total = total,
                    policy = ?self.policy,
                    "Processed count has passed the reported total"
                );
            }
        }

        state
    }

    /// Whether `state` ends the run
    pub fn is_complete(&self, state: &ProgressState) -> bool {
        state.is_complete(self.policy, self.skip)
    }
}
