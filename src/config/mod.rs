//! Configuration management for esmigrate.
//!
//! # Overview
//!
//! esmigrate reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ESMIGRATE_<SECTION>_<KEY>` environment overrides
//! - Default values for every optional setting
//! - Validation once CLI flags have been applied
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ClusterConfig`] - Source and destination hosts and versions
//! - [`ScanConfig`] - Index, type, batch size, skip, scroll timeout, query, sort
//! - [`WriteConfig`] - Write failure strategies, retries, dry run
//! - [`ProgressConfig`] - Termination policy
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [source]
//! host = "http://old-cluster:9200"
//! version = "2.3"
//!
//! [destination]
//! host = "http://new-cluster:9200"
//! version = "6.8"
//!
//! [scan]
//! index = "products"
//! type = "product"
//! batch_size = 1000
//! scroll_timeout = "30s"
//! query = { match_all = {} }
//! sort = ["_doc"]
//! ```
//!
//! # Validation
//!
//! ```rust,no_run
//! use esmigrate::config::load_config;
//!
//! # fn example() {
//! match load_config("esmigrate.toml").map(|c| c.validate()) {
//!     Ok(Ok(())) => println!("Configuration valid"),
//!     Ok(Err(e)) => eprintln!("Configuration invalid: {e}"),
//!     Err(e) => eprintln!("Configuration error: {e}"),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_defaults};
pub use schema::{
    ApplicationConfig, ClusterConfig, LoggingConfig, MigrationConfig, OnWriteFailure,
    ProgressConfig, ScanConfig, TerminationPolicy, WriteConfig,
};
