//! Core business logic for esmigrate.
//!
//! # Modules
//!
//! - [`scan`] - Cursor controller: opens, advances and releases the scroll
//! - [`transform`] - Page transformer: records to bulk action pairs
//! - [`migration`] - Batch writer, coordinator loop and summary
//! - [`state`] - Progress state and termination policy
//!
//! # Migration Workflow
//!
//! Each iteration runs strictly in order:
//!
//! 1. **Scan**: open the scroll, or advance it with the current cursor
//! 2. **Transform**: pair each record's action metadata with its body
//! 3. **Write**: submit the pairs as one bulk request (skipped for empty pages)
//! 4. **Record**: add the page size to the processed count and test for completion
//!
//! The run ends when the termination policy reports completion, when a
//! shutdown signal arrives, or on a fatal scan error.
//!
//! # Example
//!
//! ```rust,no_run
//! use esmigrate::config::load_config;
//! use esmigrate::core::migration::MigrationCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = load_config("esmigrate.toml")?;
//! config.write.dry_run = true;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let summary = MigrationCoordinator::from_config(&config, shutdown_rx)?
//!     .run()
//!     .await?;
//!
//! println!("Processed: {}", summary.processed);
//! println!("Written: {}", summary.written);
//! # Ok(())
//! # }
//! ```

pub mod migration;
pub mod scan;
pub mod state;
pub mod transform;
