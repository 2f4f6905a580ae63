//! Configuration resolution for framescribe-client
//!
//! Every setting is resolved independently with priority
//! CLI flag → environment variable → TOML file → built-in default,
//! and the winning source is logged.

use crate::workflow::{PipelineConfig, DEFAULT_CONCURRENCY};
use framescribe_common::config::TomlConfig;
use framescribe_common::{Error, Result};
use tracing::info;

pub const BACKEND_URL_ENV: &str = "FRAMESCRIBE_BACKEND_URL";
pub const ENRICH_URL_ENV: &str = "FRAMESCRIBE_ENRICH_URL";
pub const CONCURRENCY_ENV: &str = "FRAMESCRIBE_CONCURRENCY";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_ENRICH_URL: &str = "http://localhost:3000/api/analyze-frame";

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub enrich_url: Option<String>,
    pub concurrency: Option<usize>,
}

/// Fully resolved client settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub backend_url: String,
    pub enrich_url: String,
    pub concurrency: usize,
}

impl ClientConfig {
    /// Resolve every setting from its sources
    pub fn resolve(overrides: &ConfigOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let backend_url = pick(
            "Backend URL",
            non_empty(overrides.backend_url.clone()),
            non_empty(std::env::var(BACKEND_URL_ENV).ok()),
            non_empty(toml_config.backend_url.clone()),
            DEFAULT_BACKEND_URL.to_string(),
        );

        let enrich_url = pick(
            "Enrichment URL",
            non_empty(overrides.enrich_url.clone()),
            non_empty(std::env::var(ENRICH_URL_ENV).ok()),
            non_empty(toml_config.enrich_url.clone()),
            DEFAULT_ENRICH_URL.to_string(),
        );

        let concurrency = pick(
            "Concurrency",
            overrides.concurrency,
            env_concurrency()?,
            toml_config.concurrency,
            DEFAULT_CONCURRENCY,
        );

        if concurrency == 0 {
            return Err(Error::Config(
                "Concurrency must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            backend_url,
            enrich_url,
            concurrency,
        })
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            concurrency: self.concurrency,
        }
    }
}

/// Take the first available value, logging where it came from
fn pick<T: std::fmt::Debug>(
    name: &str,
    cli: Option<T>,
    env: Option<T>,
    toml: Option<T>,
    default: T,
) -> T {
    let (value, source) = if let Some(value) = cli {
        (value, "command line")
    } else if let Some(value) = env {
        (value, "environment variable")
    } else if let Some(value) = toml {
        (value, "TOML config")
    } else {
        (default, "default")
    };

    info!("{} loaded from {}: {:?}", name, source, value);
    value
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn env_concurrency() -> Result<Option<usize>> {
    match std::env::var(CONCURRENCY_ENV) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| {
                Error::Config(format!(
                    "{} must be a positive integer, got {:?}",
                    CONCURRENCY_ENV, raw
                ))
            }),
        _ => Ok(None),
    }
}
