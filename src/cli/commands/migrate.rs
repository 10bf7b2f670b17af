//! Migrate command implementation
//!
//! This module implements the `migrate` command, which copies one index from
//! the source cluster to the destination cluster.

use super::load_migration_config;
use crate::config::{MigrationConfig, OnWriteFailure, TerminationPolicy};
use crate::core::migration::{MigrationCoordinator, MigrationSummary};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the migrate command
///
/// Every flag overrides the matching configuration setting.
#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Source cluster host
    #[arg(short = 's', long, value_name = "HOST")]
    pub source_host: Option<String>,

    /// Source cluster version (e.g. 2.3)
    #[arg(long, value_name = "VERSION")]
    pub source_version: Option<String>,

    /// Destination cluster host
    #[arg(short = 'd', long, value_name = "HOST")]
    pub destination_host: Option<String>,

    /// Destination cluster version (e.g. 6.8)
    #[arg(long, value_name = "VERSION")]
    pub destination_version: Option<String>,

    /// Index to migrate
    #[arg(short = 'i', long)]
    pub index: Option<String>,

    /// Mapping type to migrate
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub doc_type: Option<String>,

    /// Documents per page
    #[arg(short = 'b', long)]
    pub batch_size: Option<usize>,

    /// Documents to skip before the first page
    #[arg(short = 'o', long)]
    pub skip: Option<u64>,

    /// Scroll keep-alive (e.g. 30s, 5m)
    #[arg(short = 'T', long, value_name = "DURATION")]
    pub scroll_timeout: Option<String>,

    /// Query body as JSON
    #[arg(short = 'q', long, value_name = "JSON")]
    pub query: Option<String>,

    /// Sort specification as JSON
    #[arg(short = 'S', long, value_name = "JSON")]
    pub sort: Option<String>,

    /// Termination policy (exhaustion or strict)
    #[arg(long, value_name = "POLICY")]
    pub termination: Option<String>,

    /// Strategy for failed writes (continue or abort)
    #[arg(long, value_name = "STRATEGY")]
    pub on_write_failure: Option<String>,

    /// Scroll the source without writing to the destination
    #[arg(long)]
    pub dry_run: bool,
}

impl MigrateArgs {
    /// Layer the flags over `config`
    ///
    /// # Errors
    ///
    /// Returns a message naming the flag whose value could not be parsed.
    pub fn apply_overrides(&self, config: &mut MigrationConfig) -> Result<(), String> {
        if let Some(host) = &self.source_host {
            config.source.host = host.clone();
        }
        if let Some(version) = &self.source_version {
            config.source.version = version
                .parse()
                .map_err(|e| format!("--source-version: {e}"))?;
        }
        if let Some(host) = &self.destination_host {
            config.destination.host = host.clone();
        }
        if let Some(version) = &self.destination_version {
            config.destination.version = version
                .parse()
                .map_err(|e| format!("--destination-version: {e}"))?;
        }

        if let Some(index) = &self.index {
            config.scan.index = index.clone();
        }
        if let Some(doc_type) = &self.doc_type {
            config.scan.doc_type = Some(doc_type.clone());
        }
        if let Some(batch_size) = self.batch_size {
            config.scan.batch_size = batch_size;
        }
        if let Some(skip) = self.skip {
            config.scan.skip = skip;
        }
        if let Some(timeout) = &self.scroll_timeout {
            config.scan.scroll_timeout = timeout
                .parse()
                .map_err(|e| format!("--scroll-timeout: {e}"))?;
        }
        if let Some(query) = &self.query {
            config.scan.query =
                serde_json::from_str(query).map_err(|e| format!("--query is not valid JSON: {e}"))?;
        }
        if let Some(sort) = &self.sort {
            config.scan.sort =
                serde_json::from_str(sort).map_err(|e| format!("--sort is not valid JSON: {e}"))?;
        }

        if let Some(termination) = &self.termination {
            config.progress.termination = termination
                .parse::<TerminationPolicy>()
                .map_err(|e| format!("--termination: {e}"))?;
        }
        if let Some(strategy) = &self.on_write_failure {
            let strategy = strategy
                .parse::<OnWriteFailure>()
                .map_err(|e| format!("--on-write-failure: {e}"))?;
            config.write.on_transport_failure = strategy;
            config.write.on_item_failure = strategy;
        }
        if self.dry_run {
            config.write.dry_run = true;
        }

        Ok(())
    }

    /// Execute the migrate command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting migrate command");

        let mut config = match load_migration_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(e.exit_code());
            }
        };

        if let Err(e) = self.apply_overrides(&mut config) {
            tracing::error!(error = %e, "Invalid command line value");
            eprintln!("Invalid command line value: {e}");
            return Ok(2);
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.write.dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - No data will be written to the destination");
            println!();
        }

        tracing::info!(
            source = %config.source.base_url(),
            source_version = %config.source.version,
            destination = %config.destination.base_url(),
            destination_version = %config.destination.version,
            index = %config.scan.index,
            termination = ?config.progress.termination,
            "Starting migration"
        );

        let coordinator = match MigrationCoordinator::from_config(&config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create migration coordinator");
                eprintln!("Failed to initialize migration: {e}");
                return Ok(e.exit_code());
            }
        };

        let summary = match coordinator.run().await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Migration failed: {e}");
                return Ok(e.exit_code());
            }
        };

        print_summary(&summary);

        let exit_code = if summary.interrupted {
            println!("⚠️  Migration interrupted. Re-run with --skip to continue further on.");
            tracing::info!("Migration interrupted by user signal");
            130
        } else if summary.failed > 0 {
            println!("⚠️  Migration completed with failed documents");
            0
        } else {
            println!("✅ Migration completed successfully!");
            0
        };

        Ok(exit_code)
    }
}

fn print_summary(summary: &MigrationSummary) {
    println!();
    println!("📊 Migration Summary:");
    println!("  Pages: {}", summary.pages);
    println!(
        "  Processed: {} of {}",
        summary.processed,
        summary
            .total
            .map(|t| t.to_string())
            .unwrap_or_else(|| "?".to_string())
    );
    println!("  Written: {}", summary.written);
    println!("  Failed: {}", summary.failed);
    println!("  Undeliverable Pages: {}", summary.transport_failures);
    if let Some(last_id) = &summary.last_record_id {
        println!("  Last Document: {last_id}");
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();
}
