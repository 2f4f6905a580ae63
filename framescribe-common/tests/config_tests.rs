//! Integration tests for config file loading

use framescribe_common::config::{load_or_default, write_toml_config, LoggingConfig, TomlConfig};
use tempfile::TempDir;

#[test]
fn test_load_or_default_without_file() {
    let config = load_or_default(None).unwrap();
    assert_eq!(config, TomlConfig::default());
}

#[test]
fn test_load_or_default_reads_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
backend_url = "http://analysis.local:8000"
enrich_url = "http://analysis.local:3000/api/analyze-frame"
concurrency = 4

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = load_or_default(Some(&path)).unwrap();
    assert_eq!(config.backend_url.as_deref(), Some("http://analysis.local:8000"));
    assert_eq!(
        config.enrich_url.as_deref(),
        Some("http://analysis.local:3000/api/analyze-frame")
    );
    assert_eq!(config.concurrency, Some(4));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_rewrite_replaces_previous_content() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");

    let first = TomlConfig {
        concurrency: Some(1),
        ..TomlConfig::default()
    };
    write_toml_config(&first, &path).unwrap();

    let second = TomlConfig {
        concurrency: Some(6),
        logging: LoggingConfig {
            level: "warn".to_string(),
        },
        ..TomlConfig::default()
    };
    write_toml_config(&second, &path).unwrap();

    let loaded = load_or_default(Some(&path)).unwrap();
    assert_eq!(loaded, second);
}
