// esmigrate - Elasticsearch scroll-to-bulk migration tool
// Copyright (c) 2025 esmigrate Contributors
// Licensed under the MIT License

//! # esmigrate - Elasticsearch index migration
//!
//! esmigrate copies the documents of one index from a source cluster to a
//! destination cluster by scrolling through the source and replaying every
//! page as a bulk index request.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Scanning** an index page by page through a scroll cursor
//! - **Transforming** each page into bulk action pairs, keeping parent routing
//! - **Writing** pages to the destination with configurable failure strategies
//! - **Tracking** progress against the total reported by the source
//!
//! ## Architecture
//!
//! esmigrate follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (scan, transform, batch writing, progress)
//! - [`adapters`] - Cluster integrations behind `SourceReader` and `DestinationWriter`
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use esmigrate::config::load_config;
//! use esmigrate::core::migration::MigrationCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("esmigrate.toml")?;
//!     config.validate()?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let summary = MigrationCoordinator::from_config(&config, shutdown_rx)?
//!         .run()
//!         .await?;
//!
//!     println!("Migrated {} of {:?} documents", summary.processed, summary.total);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::Result`], whose error type
//! [`domain::MigrateError`] says which stage failed and maps to a process
//! exit code. Transport problems are reported as [`domain::ClusterError`].
//!
//! ## Logging
//!
//! esmigrate uses structured logging with the `tracing` crate. Every page
//! produces one progress line with the processed count, the total and the
//! last document id.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
