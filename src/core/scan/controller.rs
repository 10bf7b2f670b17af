//! Cursor controller
//!
//! Owns the scroll lifecycle on behalf of the coordinator: opens the scan,
//! advances it page by page and releases it at the end. Transport errors are
//! wrapped into the scan variants of [`MigrateError`] with the context needed
//! to diagnose an expired cursor.

use crate::adapters::source::{ScanRequest, SourceReader};
use crate::config::ScanConfig;
use crate::domain::{MigrateError, Result, ScanCursor, SourcePage};
use std::sync::Arc;

/// Drives a [`SourceReader`] through one scan
pub struct CursorController {
    source: Arc<dyn SourceReader>,
    request: ScanRequest,
    pages_fetched: u64,
}

impl CursorController {
    /// Create a controller for the scan described by `config`
    pub fn new(source: Arc<dyn SourceReader>, config: &ScanConfig) -> Self {
        Self {
            source,
            request: ScanRequest::from_config(config),
            pages_fetched: 0,
        }
    }

    /// Issue the initial scan request
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::ScanOpen`] if the source rejects the request.
    /// The run must not retry.
    pub async fn open_scan(&mut self) -> Result<(ScanCursor, SourcePage)> {
        let request = &self.request;

        tracing::info!(
            source = %self.source.base_url(),
            index = %request.index,
            doc_type = request.doc_type.as_deref().unwrap_or("-"),
            size = request.size,
            skip = request.skip,
            scroll = %request.scroll_timeout,
            query = %request.query,
            sort = %request.sort,
            "Opening scan"
        );

        let (cursor, page) =
            self.source
                .open_scan(request)
                .await
                .map_err(|source| MigrateError::ScanOpen {
                    index: request.index.clone(),
                    source,
                })?;

        self.pages_fetched = 1;

        tracing::debug!(
            total = page.total,
            page_size = page.len(),
            "Scan opened"
        );

        Ok((cursor, page))
    }

    /// Request the page after the one `cursor` was returned with
    ///
    /// The returned cursor replaces `cursor`. An empty page is a normal
    /// result; whether the scan is finished is decided by the progress
    /// tracker.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::ScanAdvance`] carrying the page index and the
    /// cursor age on transport failure or cursor expiry.
    pub async fn advance(&mut self, cursor: &ScanCursor) -> Result<(ScanCursor, SourcePage)> {
        let page_index = self.pages_fetched;

        match self.source.advance(cursor).await {
            Ok((next, page)) => {
                self.pages_fetched += 1;
                tracing::debug!(
                    page_index = page_index,
                    page_size = page.len(),
                    cursor_age_ms = cursor.age().as_millis() as u64,
                    "Advanced scan"
                );
                Ok((next, page))
            }
            Err(source) => Err(MigrateError::ScanAdvance {
                page_index,
                cursor_age_ms: cursor.age().as_millis(),
                source,
            }),
        }
    }

    /// Release the server-side scroll, logging instead of failing
    pub async fn release(&self, cursor: &ScanCursor) {
        match self.source.release(cursor).await {
            Ok(()) => tracing::debug!("Scroll released"),
            Err(e) => tracing::warn!(error = %e, "Failed to release scroll"),
        }
    }

    /// Number of pages received so far, including the first
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }
}
