//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod migrate;
pub mod validate;

use crate::config::{load_config, load_defaults, MigrationConfig};
use crate::domain::Result;

/// Load the configuration file if one was given, otherwise start from defaults
///
/// `ESMIGRATE_*` overrides are applied either way.
pub fn load_migration_config(config_path: Option<&str>) -> Result<MigrationConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => load_defaults(),
    }
}
