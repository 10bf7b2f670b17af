//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Local JSON file logging with daily or hourly rotation
//! - Macros for the per-page progress line and retry attempts
//!
//! # Example
//!
//! ```no_run
//! use esmigrate::config::LoggingConfig;
//! use esmigrate::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the per-page progress line
///
/// # Example
///
/// ```no_run
/// use esmigrate::log_page_progress;
///
/// log_page_progress!(2000, Some(10_000u64), Some("doc-1999"));
/// ```
#[macro_export]
macro_rules! log_page_progress {
    ($processed:expr, $total:expr, $last_id:expr) => {
        tracing::info!(
            processed = $processed,
            total = ?$total,
            last_id = ?$last_id,
            "Processed {} of {}, last id {}",
            $processed,
            $total.map(|t: u64| t.to_string()).unwrap_or_else(|| "?".to_string()),
            $last_id.unwrap_or("-")
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use esmigrate::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, 1000u64, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_attempts:expr, $delay_ms:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay_ms,
            reason = %$reason,
            "Retrying operation"
        );
    };
}
