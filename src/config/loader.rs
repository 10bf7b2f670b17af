//! Configuration loader with TOML parsing and environment variable overrides
//!
//! Loading never validates: CLI flags are layered on top of the loaded
//! configuration afterwards, so [`MigrationConfig::validate`] is called once
//! every source of settings has been applied.

use super::schema::MigrationConfig;
use crate::domain::errors::MigrateError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "ESMIGRATE_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`MigrationConfig`]
/// 4. Applies environment variable overrides (`ESMIGRATE_*` prefix)
///
/// # Errors
///
/// Returns [`MigrateError::Configuration`] if the file cannot be read, a
/// referenced variable is unset, the TOML is malformed or an override has an
/// invalid value.
///
/// # Examples
///
/// ```no_run
/// use esmigrate::config::loader::load_config;
///
/// let config = load_config("esmigrate.toml").expect("Failed to load config");
/// config.validate().expect("Invalid config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<MigrationConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MigrateError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        MigrateError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: MigrationConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;

    Ok(config)
}

/// Builds a configuration from defaults plus `ESMIGRATE_*` overrides
///
/// Used when no configuration file is given and the run is driven by flags.
pub fn load_defaults() -> Result<MigrationConfig> {
    let mut config = MigrationConfig::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| MigrateError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(MigrateError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn parse_override<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        MigrateError::Configuration(format!("Invalid value for {ENV_PREFIX}{key}: {e}"))
    })
}

fn parse_json_override(key: &str, value: &str) -> Result<serde_json::Value> {
    serde_json::from_str(value).map_err(|e| {
        MigrateError::Configuration(format!("Invalid JSON in {ENV_PREFIX}{key}: {e}"))
    })
}

/// Applies environment variable overrides using the ESMIGRATE_* prefix
///
/// Environment variables follow the pattern `ESMIGRATE_<SECTION>_<KEY>`,
/// for example `ESMIGRATE_SOURCE_HOST` or `ESMIGRATE_SCAN_BATCH_SIZE`.
fn apply_env_overrides(config: &mut MigrationConfig) -> Result<()> {
    if let Some(val) = env_override("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Clusters
    if let Some(val) = env_override("SOURCE_HOST") {
        config.source.host = val;
    }
    if let Some(val) = env_override("SOURCE_VERSION") {
        config.source.version = parse_override("SOURCE_VERSION", &val)?;
    }
    if let Some(val) = env_override("DESTINATION_HOST") {
        config.destination.host = val;
    }
    if let Some(val) = env_override("DESTINATION_VERSION") {
        config.destination.version = parse_override("DESTINATION_VERSION", &val)?;
    }

    // Scan
    if let Some(val) = env_override("SCAN_INDEX") {
        config.scan.index = val;
    }
    if let Some(val) = env_override("SCAN_TYPE") {
        config.scan.doc_type = Some(val);
    }
    if let Some(val) = env_override("SCAN_BATCH_SIZE") {
        config.scan.batch_size = parse_override("SCAN_BATCH_SIZE", &val)?;
    }
    if let Some(val) = env_override("SCAN_SKIP") {
        config.scan.skip = parse_override("SCAN_SKIP", &val)?;
    }
    if let Some(val) = env_override("SCAN_SCROLL_TIMEOUT") {
        config.scan.scroll_timeout = parse_override("SCAN_SCROLL_TIMEOUT", &val)?;
    }
    if let Some(val) = env_override("SCAN_QUERY") {
        config.scan.query = parse_json_override("SCAN_QUERY", &val)?;
    }
    if let Some(val) = env_override("SCAN_SORT") {
        config.scan.sort = parse_json_override("SCAN_SORT", &val)?;
    }

    // Write
    if let Some(val) = env_override("WRITE_ON_TRANSPORT_FAILURE") {
        config.write.on_transport_failure = parse_override("WRITE_ON_TRANSPORT_FAILURE", &val)?;
    }
    if let Some(val) = env_override("WRITE_ON_ITEM_FAILURE") {
        config.write.on_item_failure = parse_override("WRITE_ON_ITEM_FAILURE", &val)?;
    }
    if let Some(val) = env_override("WRITE_MAX_RETRIES") {
        config.write.max_retries = parse_override("WRITE_MAX_RETRIES", &val)?;
    }
    if let Some(val) = env_override("WRITE_DRY_RUN") {
        config.write.dry_run = parse_override("WRITE_DRY_RUN", &val)?;
    }

    // Progress
    if let Some(val) = env_override("PROGRESS_TERMINATION") {
        config.progress.termination = parse_override("PROGRESS_TERMINATION", &val)?;
    }

    // Logging
    if let Some(val) = env_override("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env_override("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("ESMIGRATE_LOADER_TEST_HOST", "es-old:9200");
        let input = "host = \"${ESMIGRATE_LOADER_TEST_HOST}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "host = \"es-old:9200\"\n");
        std::env::remove_var("ESMIGRATE_LOADER_TEST_HOST");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("ESMIGRATE_LOADER_MISSING_VAR");
        let input = "host = \"${ESMIGRATE_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("ESMIGRATE_LOADER_COMMENTED");
        let input = "# host = \"${ESMIGRATE_LOADER_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-esmigrate.toml");
        assert!(matches!(result, Err(MigrateError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[source]
host = "http://old-cluster:9200"

[destination]
host = "http://new-cluster:9200"
version = "7.17"

[scan]
index = "orders"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.source.host, "http://old-cluster:9200");
        assert_eq!(config.destination.version.major, 7);
        assert_eq!(config.scan.index, "orders");
        assert_eq!(config.scan.batch_size, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_config_malformed_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[scan\nindex = ").unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(matches!(result, Err(MigrateError::Configuration(_))));
    }
}
