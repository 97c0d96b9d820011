//! Terminal rendering of status snapshots

use colored::*;
use dockhand_core::{LifecycleState, Status};
use dockhand_runtime::RuntimeConfig;

/// Print a status snapshot
pub fn print_status(status: &Status, config: &RuntimeConfig) {
    println!(
        "  {} Workload {} ({})",
        "▸".cyan(),
        config.service.bold(),
        config.engine
    );
    println!("    Status:       {}", colorize_summary(status));
    println!(
        "    Runtime:      {}",
        if status.runtime_available {
            "available".green()
        } else {
            "unavailable".red()
        }
    );
    println!(
        "    Descriptor:   {}",
        match status.descriptor_present {
            Some(true) => "present".normal(),
            Some(false) => "missing".yellow(),
            None => "unknown".dimmed(),
        }
    );
    println!(
        "    Observed:     {}",
        status
            .observed_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!("    Actions:      {}", actions_line(status));
    println!();
}

/// Print the transient state shown while an operation is in flight
pub fn print_busy(state: LifecycleState, config: &RuntimeConfig) {
    println!(
        "{} {}...",
        state.to_string().yellow().bold(),
        config.service.bold()
    );
}

/// Enabled actions for a snapshot, comma-separated
fn actions_line(status: &Status) -> String {
    let affordances = status.affordances();
    let actions: Vec<&str> = [
        ("install", affordances.can_install),
        ("stop", affordances.can_stop),
        ("open", affordances.can_open),
    ]
    .into_iter()
    .filter(|(_, enabled)| *enabled)
    .map(|(name, _)| name)
    .collect();

    if actions.is_empty() {
        "none".to_string()
    } else {
        actions.join(", ")
    }
}

/// Colorize the summary line by lifecycle state
fn colorize_summary(status: &Status) -> ColoredString {
    let summary = status.summary();
    match status.state() {
        LifecycleState::Running => summary.green(),
        LifecycleState::Stopped => summary.yellow(),
        LifecycleState::RuntimeUnavailable => summary.red(),
        LifecycleState::Installing | LifecycleState::Stopping => summary.cyan(),
    }
}
