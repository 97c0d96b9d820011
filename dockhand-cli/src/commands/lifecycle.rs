//! Lifecycle command handlers
//!
//! Each mutating command runs the operation, reports the outcome, then
//! takes a fresh snapshot so the printed state is what the runtime says,
//! not what the operation hoped for.

use anyhow::Result;
use colored::*;
use dockhand_core::{Outcome, Phase};
use dockhand_runtime::RuntimeConfig;
use std::future::Future;
use tokio::sync::watch;

use super::Controller;
use crate::render::{print_busy, print_status};

/// Install and start the workload
pub async fn install(controller: &mut Controller, config: &RuntimeConfig) -> Result<()> {
    let mut phases = controller.subscribe_phase();
    let result = with_busy_line(controller.install(), &mut phases, config).await;
    report(result, controller, config).await
}

/// Stop the workload
pub async fn stop(controller: &mut Controller, config: &RuntimeConfig) -> Result<()> {
    let mut phases = controller.subscribe_phase();
    let result = with_busy_line(controller.stop(), &mut phases, config).await;
    report(result, controller, config).await
}

/// Open the workload's UI
pub async fn open(controller: &Controller) -> Result<()> {
    if controller.open_external_ui().await {
        println!("{} {}", "Opened".green(), controller.ui_url().cyan());
    } else {
        println!(
            "{}",
            "Workload is not running; start it with `dockhand install`.".yellow()
        );
    }
    Ok(())
}

/// Drives `operation`, printing the busy line whenever the controller
/// enters a busy phase
async fn with_busy_line<F: Future>(
    operation: F,
    phases: &mut watch::Receiver<Phase>,
    config: &RuntimeConfig,
) -> F::Output {
    tokio::pin!(operation);
    loop {
        tokio::select! {
            output = &mut operation => return output,
            Ok(()) = phases.changed() => {
                if let Some(state) = phases.borrow_and_update().busy_state() {
                    print_busy(state, config);
                }
            }
        }
    }
}

/// Line printed for a successful operation
///
/// Failures are returned to `main`, which prints them once.
fn outcome_line(result: &dockhand_core::Result<Outcome>) -> Option<String> {
    match result {
        Ok(outcome) if outcome.changed() => Some(format!("{} {}", "✓".green(), outcome)),
        Ok(outcome) => Some(format!("{} {}", "•".dimmed(), outcome)),
        Err(_) => None,
    }
}

async fn report(
    result: dockhand_core::Result<Outcome>,
    controller: &Controller,
    config: &RuntimeConfig,
) -> Result<()> {
    if let Some(line) = outcome_line(&result) {
        println!("{}", line);
        println!();
    }

    let status = controller.status().await;
    print_status(&status, config);

    result.map(|_| ()).map_err(Into::into)
}
