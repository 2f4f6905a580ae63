//! Configuration loading and config file resolution
//!
//! The TOML file is bootstrap-only: it is read once at startup and never
//! watched. Every field is optional so a missing or partial file falls back
//! to built-in defaults.
//!
//! # Config File Priority
//!
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Platform config directory (`<config_dir>/framescribe/config.toml`)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "FRAMESCRIBE_CONFIG";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Base URL of the video-processing backend (e.g. `http://localhost:8000`)
    #[serde(default)]
    pub backend_url: Option<String>,

    /// Full URL of the per-frame enrichment endpoint
    #[serde(default)]
    pub enrich_url: Option<String>,

    /// Maximum number of enrichment requests in flight
    #[serde(default)]
    pub concurrency: Option<usize>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolve which config file to read, if any.
///
/// Returns `None` when no explicit path was given and the platform default
/// does not exist. An explicit path is returned even if missing so the
/// caller can report it.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    let default_path = default_config_path()?;
    if default_path.exists() {
        Some(default_path)
    } else {
        debug!("No config file at {}", default_path.display());
        None
    }
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("framescribe").join("config.toml"))
}

/// Load the TOML config file at `path`.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Read config {} failed: {}", path.display(), e))
    })?;
    let config: TomlConfig = toml::from_str(&content)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the resolved path, or defaults when there is none.
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    match path {
        Some(path) => load_toml_config(path),
        None => Ok(TomlConfig::default()),
    }
}

/// Write config to `path` atomically (temp file + rename).
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_logging_level() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert!(config.backend_url.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: TomlConfig = toml::from_str("concurrency = 5\n").unwrap();
        assert_eq!(config.concurrency, Some(5));
        assert_eq!(config.logging.level, "info");
        assert!(config.enrich_url.is_none());
    }

    #[test]
    #[serial]
    fn test_cli_path_wins_over_env() {
        std::env::set_var("FRAMESCRIBE_TEST_CONFIG_A", "/from/env.toml");
        let resolved = resolve_config_path(
            Some(Path::new("/from/cli.toml")),
            "FRAMESCRIBE_TEST_CONFIG_A",
        );
        std::env::remove_var("FRAMESCRIBE_TEST_CONFIG_A");
        assert_eq!(resolved, Some(PathBuf::from("/from/cli.toml")));
    }

    #[test]
    #[serial]
    fn test_env_path_used_without_cli() {
        std::env::set_var("FRAMESCRIBE_TEST_CONFIG_B", "/from/env.toml");
        let resolved = resolve_config_path(None, "FRAMESCRIBE_TEST_CONFIG_B");
        std::env::remove_var("FRAMESCRIBE_TEST_CONFIG_B");
        assert_eq!(resolved, Some(PathBuf::from("/from/env.toml")));
    }

    #[test]
    fn test_write_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = TomlConfig {
            backend_url: Some("http://backend:8000".to_string()),
            enrich_url: None,
            concurrency: Some(2),
            logging: LoggingConfig {
                level: "debug".to_string(),
            },
        };
        write_toml_config(&config, &path).unwrap();

        let loaded = load_toml_config(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_toml_config(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "concurrency = \"three\"").unwrap();
        assert!(matches!(load_toml_config(&path), Err(Error::TomlParse(_))));
    }
}
