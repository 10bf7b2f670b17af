//! Validate config command implementation
//!
//! This module implements the `validate-config` command, which loads the
//! configuration the same way `migrate` does and reports the resolved
//! settings without contacting either cluster.

use super::load_migration_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let source_name = config_path.unwrap_or("<defaults and environment>");
        tracing::info!(config_path = %source_name, "Validating configuration");

        println!("🔍 Validating configuration: {source_name}");
        println!();

        let config = match load_migration_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        match config.validate() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Log Level: {}", config.application.log_level);
                println!(
                    "  Source: {} (version {})",
                    config.source.base_url(),
                    config.source.version
                );
                println!(
                    "  Destination: {} (version {})",
                    config.destination.base_url(),
                    config.destination.version
                );
                println!("  Index: {}", config.scan.index);
                println!(
                    "  Type: {}",
                    config.scan.doc_type.as_deref().unwrap_or("(all)")
                );
                println!("  Batch Size: {}", config.scan.batch_size);
                println!("  Skip: {}", config.scan.skip);
                println!("  Scroll Timeout: {}", config.scan.scroll_timeout);
                println!("  Query: {}", config.scan.query);
                println!("  Sort: {}", config.scan.sort);
                println!(
                    "  On Write Failure: transport={:?}, items={:?}",
                    config.write.on_transport_failure, config.write.on_item_failure
                );
                println!("  Max Retries: {}", config.write.max_retries);
                println!("  Termination: {:?}", config.progress.termination);
                println!("  Dry Run: {}", config.write.dry_run);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}
