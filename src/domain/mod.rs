//! Domain models and types for esmigrate.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Records and pages** ([`SourceRecord`], [`SourcePage`]) as read from the source cluster
//! - **Write actions** ([`ActionMetadata`], [`WriteActionPair`]) as sent to the destination
//! - **Cursor types** ([`ScanCursor`], [`ScrollTimeout`])
//! - **Cluster versions** ([`ClusterVersion`])
//! - **Error types** ([`MigrateError`], [`ClusterError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, MigrateError>`]:
//!
//! ```rust
//! use esmigrate::domain::{MigrateError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = esmigrate::config::MigrationConfig::default();
//!     config.validate().map_err(MigrateError::Configuration)?;
//!     Ok(())
//! }
//! ```

pub mod cursor;
pub mod errors;
pub mod record;
pub mod result;
pub mod version;

pub use cursor::{ScanCursor, ScrollTimeout};
pub use errors::{ClusterError, MigrateError};
pub use record::{ActionMetadata, SourcePage, SourceRecord, WriteActionPair};
pub use result::Result;
pub use version::ClusterVersion;
