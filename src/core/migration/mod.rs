//! Migration orchestration
//!
//! This module provides the migration loop for esmigrate:
//! - Batch writing with failure strategies and bounded retries
//! - Coordination of scan, transform, write and progress
//! - Summary and reporting

pub mod batch;
pub mod coordinator;
pub mod summary;

pub use batch::{BatchWriter, RetryPolicy, WriteOutcome, WriteStatus};
pub use coordinator::MigrationCoordinator;
pub use summary::MigrationSummary;
