//! Dockhand CLI
//!
//! Command-line interface for observing and controlling a single
//! containerized workload.

mod commands;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{Commands, handle_command};
use dockhand_runtime::{Engine, RuntimeConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(about = "Observe and control a single containerized workload", long_about = None)]
struct Cli {
    /// Container engine (docker or podman)
    #[arg(long, env = "DOCKHAND_ENGINE")]
    engine: Option<Engine>,

    /// Compose file describing the workload
    #[arg(short = 'f', long, env = "DOCKHAND_COMPOSE_FILE")]
    compose_file: Option<PathBuf>,

    /// Compose service that makes up the workload
    #[arg(short, long, env = "DOCKHAND_SERVICE")]
    service: Option<String>,

    /// URL of the workload's UI
    #[arg(long, env = "DOCKHAND_UI_URL")]
    url: Option<String>,

    /// Log what dockhand is doing to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "dockhand_cli=info,dockhand_core=info,dockhand_runtime=debug"
    } else {
        "dockhand_cli=warn,dockhand_core=warn,dockhand_runtime=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    handle_command(cli.command, &config).await
}

/// Loads configuration from the environment and applies command-line overrides
fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let mut config = RuntimeConfig::from_env().context("Failed to load configuration")?;

    if let Some(engine) = cli.engine {
        config.engine = engine;
    }
    if let Some(file) = &cli.compose_file {
        config.compose_file = file.clone();
    }
    if let Some(service) = &cli.service {
        config.service = service.clone();
    }
    if let Some(url) = &cli.url {
        config.ui_url = url.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
