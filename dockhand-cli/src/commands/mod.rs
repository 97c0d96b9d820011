//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod lifecycle;
mod status;

use anyhow::Result;
use clap::Subcommand;
use dockhand_core::LifecycleController;
use dockhand_runtime::{ComposeRuntime, RuntimeConfig, SystemBrowser};
use std::sync::Arc;

/// Controller wired to the real engine and browser
pub type Controller = LifecycleController<ComposeRuntime, SystemBrowser>;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show runtime, descriptor and workload status
    Status {
        /// Print the status snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Install and start the workload
    #[command(alias = "start")]
    Install,
    /// Stop the workload (keeps its descriptor)
    Stop,
    /// Open the workload's UI in a browser
    Open,
    /// Refresh the status until interrupted
    Watch {
        /// Seconds between refreshes (defaults to DOCKHAND_WATCH_INTERVAL)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The runtime configuration
pub async fn handle_command(command: Commands, config: &RuntimeConfig) -> Result<()> {
    let mut controller = build_controller(config);

    match command {
        Commands::Status { json } => status::show_status(&controller, config, json).await,
        Commands::Install => lifecycle::install(&mut controller, config).await,
        Commands::Stop => lifecycle::stop(&mut controller, config).await,
        Commands::Open => lifecycle::open(&controller).await,
        Commands::Watch { interval } => {
            let interval = interval
                .filter(|secs| *secs > 0)
                .map(std::time::Duration::from_secs)
                .unwrap_or(config.watch_interval);
            status::watch(&controller, config, interval).await
        }
    }
}

fn build_controller(config: &RuntimeConfig) -> Controller {
    let runtime = Arc::new(ComposeRuntime::new(config.clone()));
    LifecycleController::new(runtime, SystemBrowser::new(), config.ui_url.clone())
        .with_probe_timeout(config.probe_timeout)
        .with_operation_timeout(config.operation_timeout)
}
