//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "esmigrate.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing esmigrate configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your cluster hosts and index", self.output);
                println!("  2. Validate configuration: esmigrate validate-config");
                println!("  3. Try a dry run: esmigrate migrate --dry-run");
                println!("  4. Run the migration: esmigrate migrate");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# esmigrate configuration

[source]
host = "http://localhost:9200"
version = "2.3"

[destination]
host = "http://localhost:9201"
version = "6.8"

[scan]
index = "my_index"
batch_size = 1000
scroll_timeout = "30s"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# esmigrate configuration
#
# Values may reference environment variables as ${VAR_NAME}. Any setting can
# also be overridden with ESMIGRATE_<SECTION>_<KEY>, and the migrate command
# flags override both.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Clusters
# ============================================================================
[source]
# Host and port; http:// is assumed when no scheme is given
host = "http://localhost:9200"

# Cluster version, selects the scroll dialect (scan search type below 5.0,
# typeless requests from 7.0)
version = "2.3"

# Per-request timeout in seconds
request_timeout_seconds = 60

[destination]
host = "http://localhost:9201"
version = "6.8"
request_timeout_seconds = 60

# ============================================================================
# Scan
# ============================================================================
[scan]
# Index to copy (required)
index = "my_index"

# Restrict to one mapping type (optional, ignored by 7.x sources)
# type = "my_type"

# Documents per page
batch_size = 1000

# Documents to skip before the first page
skip = 0

# Scroll keep-alive (d, h, m, s, ms, micros, nanos)
scroll_timeout = "30s"

# Query and sort bodies
query = { match_all = {} }
sort = ["_doc"]

# ============================================================================
# Writes
# ============================================================================
[write]
# continue: log and keep scrolling; abort: stop the run
on_transport_failure = "continue"
on_item_failure = "continue"

# Retries for undeliverable bulk requests. The summed backoff never exceeds
# half the scroll timeout.
max_retries = 0
initial_delay_ms = 500
max_delay_ms = 10000
backoff_multiplier = 2.0

# Scroll the source without writing anything
dry_run = false

# ============================================================================
# Progress
# ============================================================================
[progress]
# exhaustion: finish when processed == total, or once processed has passed
#             total and the source returns an empty page
# strict:     finish only when processed == total
termination = "exhaustion"

# ============================================================================
# Logging
# ============================================================================
[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "/var/log/esmigrate"

# daily or hourly
local_rotation = "daily"
"#
        .to_string()
    }
}
