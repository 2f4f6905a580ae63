//! Config file + environment resolution tests

use framescribe_client::config::{
    ClientConfig, ConfigOverrides, BACKEND_URL_ENV, CONCURRENCY_ENV, DEFAULT_ENRICH_URL,
    ENRICH_URL_ENV,
};
use framescribe_common::config::{load_or_default, resolve_config_path};
use serial_test::serial;
use tempfile::TempDir;

fn clear_env() {
    std::env::remove_var(BACKEND_URL_ENV);
    std::env::remove_var(ENRICH_URL_ENV);
    std::env::remove_var(CONCURRENCY_ENV);
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_config_file_named_by_env_var() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
backend_url = "http://gpu-box:8000"
concurrency = 6

[logging]
level = "debug"
"#,
    );

    std::env::set_var("FRAMESCRIBE_TEST_CLIENT_CONFIG", &path);
    let resolved = resolve_config_path(None, "FRAMESCRIBE_TEST_CLIENT_CONFIG");
    std::env::remove_var("FRAMESCRIBE_TEST_CLIENT_CONFIG");

    let toml_config = load_or_default(resolved.as_deref()).unwrap();
    let config = ClientConfig::resolve(&ConfigOverrides::default(), &toml_config).unwrap();

    assert_eq!(config.backend_url, "http://gpu-box:8000");
    assert_eq!(config.enrich_url, DEFAULT_ENRICH_URL);
    assert_eq!(config.concurrency, 6);
    assert_eq!(toml_config.logging.level, "debug");
}

#[test]
#[serial]
fn test_env_beats_file_and_cli_beats_env() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        "enrich_url = \"http://file/api/analyze-frame\"\nconcurrency = 4\n",
    );
    let toml_config = load_or_default(Some(&path)).unwrap();

    std::env::set_var(ENRICH_URL_ENV, "http://env/api/analyze-frame");
    let from_env = ClientConfig::resolve(&ConfigOverrides::default(), &toml_config);

    let overrides = ConfigOverrides {
        enrich_url: Some("http://cli/api/analyze-frame".to_string()),
        ..ConfigOverrides::default()
    };
    let from_cli = ClientConfig::resolve(&overrides, &toml_config);
    clear_env();

    let from_env = from_env.unwrap();
    assert_eq!(from_env.enrich_url, "http://env/api/analyze-frame");
    assert_eq!(from_env.concurrency, 4);
    assert_eq!(from_cli.unwrap().enrich_url, "http://cli/api/analyze-frame");
}

#[test]
#[serial]
fn test_zero_concurrency_in_file_rejected() {
    clear_env();
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "concurrency = 0\n");
    let toml_config = load_or_default(Some(&path)).unwrap();

    assert!(ClientConfig::resolve(&ConfigOverrides::default(), &toml_config).is_err());
}
