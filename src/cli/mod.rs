//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for esmigrate using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// esmigrate - Elasticsearch index migration tool
#[derive(Parser, Debug)]
#[command(name = "esmigrate")]
#[command(version, about, long_about = None)]
#[command(author = "esmigrate Contributors")]
pub struct Cli {
    /// Path to configuration file (optional, flags and ESMIGRATE_* variables suffice)
    #[arg(short, long, env = "ESMIGRATE_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ESMIGRATE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy an index from the source cluster to the destination cluster
    Migrate(commands::migrate::MigrateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
