//! Integration tests for configuration loading and validation
//!
//! Tests touching environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use esmigrate::config::{load_config, load_defaults, OnWriteFailure, TerminationPolicy};
use serde_json::json;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    std::env::remove_var("ESMIGRATE_APPLICATION_LOG_LEVEL");
    std::env::remove_var("ESMIGRATE_SOURCE_HOST");
    std::env::remove_var("ESMIGRATE_SCAN_INDEX");
    std::env::remove_var("ESMIGRATE_SCAN_BATCH_SIZE");
    std::env::remove_var("ESMIGRATE_SCAN_QUERY");
    std::env::remove_var("ESMIGRATE_PROGRESS_TERMINATION");
    std::env::remove_var("ESMIGRATE_WRITE_DRY_RUN");
    std::env::remove_var("TEST_ES_SOURCE_HOST");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"

[source]
host = "https://old-cluster.example.com:9200"
version = "1.7"
request_timeout_seconds = 120

[destination]
host = "new-cluster:9200"
version = "7.17.9"

[scan]
index = "orders"
type = "order"
batch_size = 500
skip = 1000
scroll_timeout = "5m"
query = { range = { created = { gte = "2020-01-01" } } }
sort = [{ created = "asc" }]

[write]
on_transport_failure = "abort"
on_item_failure = "continue"
max_retries = 3
initial_delay_ms = 100
max_delay_ms = 2000
backoff_multiplier = 3.0
dry_run = true

[progress]
termination = "strict"

[logging]
local_enabled = true
local_path = "/tmp/esmigrate"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert!(config.validate().is_ok());

    assert_eq!(config.application.log_level, "debug");

    assert_eq!(config.source.base_url(), "https://old-cluster.example.com:9200");
    assert_eq!(config.source.version.major, 1);
    assert_eq!(config.source.request_timeout_seconds, 120);
    assert_eq!(config.destination.base_url(), "http://new-cluster:9200");
    assert!(config.destination.version.is_typeless());

    assert_eq!(config.scan.index, "orders");
    assert_eq!(config.scan.doc_type.as_deref(), Some("order"));
    assert_eq!(config.scan.batch_size, 500);
    assert_eq!(config.scan.skip, 1000);
    assert_eq!(config.scan.scroll_timeout.as_str(), "5m");
    assert_eq!(
        config.scan.query,
        json!({"range": {"created": {"gte": "2020-01-01"}}})
    );
    assert_eq!(config.scan.sort, json!([{"created": "asc"}]));

    assert_eq!(config.write.on_transport_failure, OnWriteFailure::Abort);
    assert_eq!(config.write.on_item_failure, OnWriteFailure::Continue);
    assert_eq!(config.write.max_retries, 3);
    assert!(config.write.dry_run);

    assert_eq!(config.progress.termination, TerminationPolicy::Strict);

    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[source]
host = "localhost:9200"

[destination]
host = "localhost:9201"

[scan]
index = "products"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert!(config.validate().is_ok());

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.source.version.to_string(), "2.3");
    assert_eq!(config.source.request_timeout_seconds, 60);
    assert_eq!(config.scan.doc_type, None);
    assert_eq!(config.scan.batch_size, 1000);
    assert_eq!(config.scan.skip, 0);
    assert_eq!(config.scan.scroll_timeout.as_str(), "30s");
    assert_eq!(config.scan.query, json!({"match_all": {}}));
    assert_eq!(config.scan.sort, json!(["_doc"]));
    assert_eq!(config.write.on_transport_failure, OnWriteFailure::Continue);
    assert_eq!(config.write.max_retries, 0);
    assert!(!config.write.dry_run);
    assert_eq!(config.progress.termination, TerminationPolicy::Exhaustion);
    assert!(!config.logging.local_enabled);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_ES_SOURCE_HOST", "es-legacy.internal:9200");

    let file = write_config(
        r#"
[source]
host = "${TEST_ES_SOURCE_HOST}"

[destination]
host = "localhost:9201"

[scan]
index = "products"
"#,
    );

    let result = load_config(file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(config.source.host, "es-legacy.internal:9200");
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[source]
host = "${TEST_ES_SOURCE_HOST}"
"#,
    );

    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_ES_SOURCE_HOST"));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("ESMIGRATE_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("ESMIGRATE_SCAN_BATCH_SIZE", "250");
    std::env::set_var("ESMIGRATE_SCAN_QUERY", r#"{"term": {"active": true}}"#);
    std::env::set_var("ESMIGRATE_PROGRESS_TERMINATION", "strict");

    let file = write_config(
        r#"
[application]
log_level = "info"

[source]
host = "localhost:9200"

[destination]
host = "localhost:9201"

[scan]
index = "products"
batch_size = 1000
"#,
    );

    let result = load_config(file.path());
    cleanup_env_vars();

    let config = result.unwrap();
    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.scan.batch_size, 250);
    assert_eq!(config.scan.query, json!({"term": {"active": true}}));
    assert_eq!(config.progress.termination, TerminationPolicy::Strict);
}

#[test]
fn test_invalid_env_override_is_config_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("ESMIGRATE_WRITE_DRY_RUN", "sometimes");

    let result = load_defaults();
    cleanup_env_vars();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("ESMIGRATE_WRITE_DRY_RUN"));
}

#[test]
fn test_defaults_driven_by_env_only() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("ESMIGRATE_SOURCE_HOST", "localhost:9200");
    std::env::set_var("ESMIGRATE_SCAN_INDEX", "products");

    let result = load_defaults();
    cleanup_env_vars();

    let mut config = result.unwrap();
    assert_eq!(config.source.host, "localhost:9200");
    assert_eq!(config.scan.index, "products");

    // Destination is still missing
    assert!(config.validate().is_err());
    config.destination.host = "localhost:9201".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        ("[scan]\nindex = \"products\"\n", "source.host"),
        (
            "[source]\nhost = \"a:9200\"\n[destination]\nhost = \"b:9200\"\n",
            "scan.index",
        ),
        (
            "[source]\nhost = \"a:9200\"\n[destination]\nhost = \"b:9200\"\n[scan]\nindex = \"p\"\nbatch_size = 0\n",
            "scan.batch_size",
        ),
        (
            "[source]\nhost = \"a:9200\"\n[destination]\nhost = \"b:9200\"\n[scan]\nindex = \"p\"\nquery = \"match_all\"\n",
            "scan.query",
        ),
        (
            "[source]\nhost = \"a:9200\"\n[destination]\nhost = \"b:9200\"\n[scan]\nindex = \"p\"\n[write]\nmax_retries = 11\n",
            "write.max_retries",
        ),
    ];

    for (toml, expected) in cases {
        let file = write_config(toml);
        let config = load_config(file.path()).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains(expected), "expected '{expected}' in '{err}'");
    }
}

#[test]
fn test_malformed_values_fail_to_load() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    for toml in [
        "[scan]\nscroll_timeout = \"30\"\n",
        "[source]\nversion = \"two\"\n",
        "[progress]\ntermination = \"eventually\"\n",
    ] {
        let file = write_config(toml);
        assert!(load_config(file.path()).is_err(), "accepted: {toml}");
    }
}
