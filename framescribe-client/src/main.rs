//! framescribe - Main entry point
//!
//! Uploads a video to the analysis backend, follows its event stream,
//! requests a description for every detected visual element and prints the
//! resulting annotations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use framescribe_client::config::{ClientConfig, ConfigOverrides};
use framescribe_client::services::{HttpFrameEnricher, HttpVideoBackend};
use framescribe_client::{Pipeline, Snapshot, Status};
use framescribe_common::config::{load_or_default, resolve_config_path, CONFIG_PATH_ENV};
use framescribe_common::human_time::format_timestamp;
use tokio::signal;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for framescribe
#[derive(Parser, Debug)]
#[command(name = "framescribe")]
#[command(about = "Find visual elements in a video and describe them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a video and print its annotations
    Analyze {
        /// Video file to upload
        video: PathBuf,

        #[command(flatten)]
        common: CommonArgs,

        /// Maximum concurrent description requests
        #[arg(long)]
        concurrency: Option<usize>,

        /// Enrichment endpoint URL
        #[arg(long)]
        enrich_url: Option<String>,

        /// Print the final snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the analysis backend is reachable
    Health {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Base URL of the analysis backend
    #[arg(long)]
    backend_url: Option<String>,

    /// Config file (default: <config dir>/framescribe/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let common = match &cli.command {
        Command::Analyze { common, .. } | Command::Health { common } => common,
    };
    let config_path = resolve_config_path(common.config.as_deref(), CONFIG_PATH_ENV);
    let toml_config =
        load_or_default(config_path.as_deref()).context("Failed to load config file")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                let level = &toml_config.logging.level;
                format!(
                    "framescribe={level},framescribe_client={level},framescribe_common={level}"
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        git = env!("FRAMESCRIBE_GIT_REVISION"),
        built_at = env!("FRAMESCRIBE_BUILT_AT"),
        profile = env!("FRAMESCRIBE_BUILD_PROFILE"),
        target = env!("FRAMESCRIBE_BUILD_TARGET"),
        "framescribe {}",
        env!("CARGO_PKG_VERSION")
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file, using defaults"),
    }

    match cli.command {
        Command::Analyze {
            video,
            common,
            concurrency,
            enrich_url,
            json,
        } => {
            let overrides = ConfigOverrides {
                backend_url: common.backend_url,
                enrich_url,
                concurrency,
            };
            let config = ClientConfig::resolve(&overrides, &toml_config)?;
            analyze(video, &config, json).await
        }
        Command::Health { common } => {
            let overrides = ConfigOverrides {
                backend_url: common.backend_url,
                ..ConfigOverrides::default()
            };
            let config = ClientConfig::resolve(&overrides, &toml_config)?;
            health(&config).await
        }
    }
}

async fn analyze(video: PathBuf, config: &ClientConfig, json: bool) -> Result<()> {
    if !video.is_file() {
        bail!("Video file not found: {}", video.display());
    }

    let backend = HttpVideoBackend::new(config.backend_url.clone())
        .context("Failed to create backend client")?;
    let enricher = HttpFrameEnricher::new(config.enrich_url.clone())
        .context("Failed to create enrichment client")?;

    let pipeline = Pipeline::new(
        Arc::new(backend),
        Arc::new(enricher),
        config.pipeline_config(),
    );

    let watcher = tokio::spawn(log_progress(pipeline.subscribe()));

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            interrupt.cancel();
        }
    });

    let run = pipeline.run(&video, &cancel).await;
    watcher.abort();
    info!(status = ?run.snapshot.status, "{}", run.snapshot.message);

    if json {
        println!("{}", serde_json::to_string_pretty(&run.snapshot)?);
    } else {
        print_annotations(&run.snapshot);
    }

    if run.cancelled {
        warn!("Run cancelled; results are partial");
        return Ok(());
    }

    if run.snapshot.status == Status::Error {
        bail!(
            "{}",
            run.snapshot
                .error_message
                .as_deref()
                .unwrap_or("Error during processing.")
        );
    }

    Ok(())
}

async fn health(config: &ClientConfig) -> Result<()> {
    let backend = HttpVideoBackend::new(config.backend_url.clone())
        .context("Failed to create backend client")?;
    let status = backend.health().await?;

    if !status.is_ok() {
        bail!("Backend at {} reports status {:?}", backend.base_url(), status.status);
    }

    println!("Backend at {} is healthy", backend.base_url());
    Ok(())
}

/// Log every status or message change
async fn log_progress(mut updates: watch::Receiver<Snapshot>) {
    let mut last: Option<(Status, String)> = None;

    while updates.changed().await.is_ok() {
        let (status, message, progress) = {
            let snapshot = updates.borrow_and_update();
            (
                snapshot.status,
                snapshot.message.clone(),
                snapshot.overall_progress(),
            )
        };

        let current = (status, message);
        if last.as_ref() != Some(&current) {
            info!(
                status = ?current.0,
                progress = %format!("{:.0}%", progress),
                "{}",
                current.1
            );
            last = Some(current);
        }
    }
}

fn print_annotations(snapshot: &Snapshot) {
    if snapshot.annotations.is_empty() {
        println!("No visual elements found.");
        return;
    }

    for annotation in &snapshot.annotations {
        let description = if annotation.description.is_empty() {
            "(no description)"
        } else {
            annotation.description.as_str()
        };
        println!(
            "{}  {}  {}",
            format_timestamp(annotation.timestamp),
            annotation.element_type,
            description
        );
    }
}
