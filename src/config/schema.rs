//! Configuration schema types
//!
//! This module defines the configuration structure for esmigrate. Every
//! section has defaults so a run can be configured from CLI flags alone;
//! [`MigrationConfig::validate`] enforces the required settings.

use crate::domain::{ClusterVersion, ScrollTimeout};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What to do when a bulk write fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OnWriteFailure {
    /// Log the failure, count the page as processed and keep scrolling
    #[default]
    Continue,
    /// Stop the run with an error
    Abort,
}

impl std::str::FromStr for OnWriteFailure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "Invalid write failure strategy '{other}'. Must be one of: continue, abort"
            )),
        }
    }
}

/// How the progress tracker decides the scan is finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TerminationPolicy {
    /// Finish when processed == total, or when processed has passed total
    /// and the cluster returned an empty page
    #[default]
    Exhaustion,
    /// Finish only when processed == total
    Strict,
}

impl std::str::FromStr for TerminationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exhaustion" => Ok(Self::Exhaustion),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "Invalid termination policy '{other}'. Must be one of: exhaustion, strict"
            )),
        }
    }
}

/// Main esmigrate configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Cluster documents are read from
    #[serde(default)]
    pub source: ClusterConfig,

    /// Cluster documents are written to
    #[serde(default)]
    pub destination: ClusterConfig,

    /// Scan parameters
    #[serde(default)]
    pub scan: ScanConfig,

    /// Bulk write behaviour
    #[serde(default)]
    pub write: WriteConfig,

    /// Progress tracking
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MigrationConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a required setting is missing or a value is out of range
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate("source")?;
        self.destination.validate("destination")?;
        self.scan.validate()?;
        self.write.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Connection settings for one cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Protocol (optional), host and port of the cluster
    #[serde(default)]
    pub host: String,

    /// Cluster version, selects the request dialect
    #[serde(default)]
    pub version: ClusterVersion,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl ClusterConfig {
    /// Host with an `http://` scheme added when none was given
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        }
    }

    fn validate(&self, section: &str) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err(format!("{section}.host is a required parameter"));
        }

        let parsed = url::Url::parse(&self.base_url())
            .map_err(|e| format!("{section}.host '{}' is not a valid URL: {e}", self.host))?;
        if parsed.host_str().is_none() {
            return Err(format!("{section}.host '{}' has no host name", self.host));
        }

        if self.request_timeout_seconds == 0 {
            return Err(format!("{section}.request_timeout_seconds must be > 0"));
        }

        Ok(())
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            version: ClusterVersion::default(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

/// Scan parameters for the source cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Index to migrate
    #[serde(default)]
    pub index: String,

    /// Mapping type to restrict the scan to
    #[serde(default, rename = "type")]
    pub doc_type: Option<String>,

    /// Documents per page
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Documents to skip at the start of the scan
    #[serde(default)]
    pub skip: u64,

    /// How long the cluster keeps the scroll open between pages
    #[serde(default)]
    pub scroll_timeout: ScrollTimeout,

    /// Query body
    #[serde(default = "default_query")]
    pub query: Value,

    /// Sort specification
    #[serde(default = "default_sort")]
    pub sort: Value,
}

impl ScanConfig {
    fn validate(&self) -> Result<(), String> {
        if self.index.trim().is_empty() {
            return Err("scan.index is a required parameter".to_string());
        }

        if self.doc_type.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err("scan.type cannot be empty when set".to_string());
        }

        if self.batch_size == 0 {
            return Err("scan.batch_size must be > 0".to_string());
        }

        if !self.query.is_object() {
            return Err("scan.query must be a JSON object".to_string());
        }

        if !(self.sort.is_array() || self.sort.is_object() || self.sort.is_string()) {
            return Err("scan.sort must be a string, array or object".to_string());
        }

        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            index: String::new(),
            doc_type: None,
            batch_size: default_batch_size(),
            skip: 0,
            scroll_timeout: ScrollTimeout::default(),
            query: default_query(),
            sort: default_sort(),
        }
    }
}

/// Bulk write configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteConfig {
    /// Strategy when the bulk request cannot be delivered
    #[serde(default)]
    pub on_transport_failure: OnWriteFailure,

    /// Strategy when the destination rejects individual items
    #[serde(default)]
    pub on_item_failure: OnWriteFailure,

    /// Retries for undeliverable bulk requests
    #[serde(default)]
    pub max_retries: usize,

    /// Initial retry delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum retry delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Read and transform without writing to the destination
    #[serde(default)]
    pub dry_run: bool,
}

impl WriteConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries > 10 {
            return Err(format!(
                "write.max_retries must be <= 10, got {}",
                self.max_retries
            ));
        }

        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "write.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if self.initial_delay_ms > self.max_delay_ms {
            return Err(format!(
                "write.initial_delay_ms ({}) cannot exceed write.max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            ));
        }

        Ok(())
    }
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            on_transport_failure: OnWriteFailure::default(),
            on_item_failure: OnWriteFailure::default(),
            max_retries: 0,
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            dry_run: false,
        }
    }
}

/// Progress tracking configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Termination policy
    #[serde(default)]
    pub termination: TerminationPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    60
}

fn default_batch_size() -> usize {
    1000
}

fn default_query() -> Value {
    serde_json::json!({ "match_all": {} })
}

fn default_sort() -> Value {
    serde_json::json!(["_doc"])
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_local_path() -> String {
    "/var/log/esmigrate".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
