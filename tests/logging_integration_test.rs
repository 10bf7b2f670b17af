//! Integration tests for logging functionality

use esmigrate::config::{LoggingConfig, MigrationConfig};
use esmigrate::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "/var/log/esmigrate");
}

#[test]
fn test_logging_rotation_types() {
    for (rotation, valid) in [("daily", true), ("hourly", true), ("size", false)] {
        let mut config = valid_config();
        config.logging.local_rotation = rotation.to_string();

        assert_eq!(config.validate().is_ok(), valid, "rotation {rotation}");
    }
}

#[test]
fn test_local_logging_requires_path() {
    let mut config = valid_config();
    config.logging.local_enabled = true;
    config.logging.local_path = " ".to_string();

    let err = config.validate().unwrap_err();
    assert!(err.contains("logging.local_path"));
}

// The only test in this binary that installs the global subscriber
#[test]
fn test_init_logging_creates_log_directory() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "hourly".to_string(),
    };

    assert!(!log_path.exists());
    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.is_dir());

    esmigrate::log_page_progress!(10u64, Some(20u64), Some("doc-10"));
    esmigrate::log_retry_attempt!(1, 3, 500u64, "connection reset");

    drop(guard);
}

fn valid_config() -> MigrationConfig {
    let mut config = MigrationConfig::default();
    config.source.host = "localhost:9200".to_string();
    config.destination.host = "localhost:9201".to_string();
    config.scan.index = "products".to_string();
    config
}
