//! Status command handlers
//!
//! One-shot status output and the refresh loop.

use anyhow::{Context, Result};
use colored::*;
use dockhand_core::{ExternalUi, LifecycleController, Status, WorkloadRuntime};
use dockhand_runtime::RuntimeConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info};

use super::Controller;
use crate::render::print_status;

/// Take one snapshot and print it
pub async fn show_status(
    controller: &Controller,
    config: &RuntimeConfig,
    json: bool,
) -> Result<()> {
    let status = controller.status().await;

    if json {
        let rendered = serde_json::to_string_pretty(&StatusReport::new(&status))
            .context("Failed to serialize status")?;
        println!("{}", rendered);
    } else {
        print_status(&status, config);
    }

    Ok(())
}

/// Re-probe every `interval` and print whenever the observation changes
///
/// Runs until Ctrl-C.
pub async fn watch(
    controller: &Controller,
    config: &RuntimeConfig,
    interval: Duration,
) -> Result<()> {
    info!("Watching {} every {:?}", config.service, interval);
    println!(
        "{}",
        format!("Watching {} (Ctrl-C to stop)", config.service).bold()
    );
    println!();

    watch_until(controller, interval, tokio::signal::ctrl_c(), |status| {
        print_status(status, config)
    })
    .await
}

/// Refresh loop behind `watch`
///
/// `shutdown` is created once and polled across iterations, so a signal
/// that arrives while a refresh is in flight still ends the loop.
async fn watch_until<R, U, S, P>(
    controller: &LifecycleController<R, U>,
    interval: Duration,
    shutdown: S,
    mut print: P,
) -> Result<()>
where
    R: WorkloadRuntime,
    U: ExternalUi,
    S: Future<Output = std::io::Result<()>>,
    P: FnMut(&Status),
{
    let mut ticker = tokio::time::interval(interval);
    let mut last: Option<Status> = None;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            result = &mut shutdown => {
                result.context("Failed to listen for Ctrl-C")?;
                break;
            }
            _ = ticker.tick() => {
                let status = controller.status().await;
                if last.as_ref().is_none_or(|prev| !prev.same_observation(&status)) {
                    print(&status);
                } else {
                    debug!("Status unchanged: {}", status.summary());
                }
                last = Some(status);
            }
        }
    }

    Ok(())
}

/// JSON shape of `status --json`
#[derive(serde::Serialize)]
struct StatusReport<'a> {
    #[serde(flatten)]
    status: &'a Status,
    state: dockhand_core::LifecycleState,
    summary: String,
    affordances: dockhand_core::Affordances,
}

impl<'a> StatusReport<'a> {
    fn new(status: &'a Status) -> Self {
        Self {
            status,
            state: status.state(),
            summary: status.summary(),
            affordances: status.affordances(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Runtime whose liveness check takes ten seconds
    struct SlowRuntime;

    #[async_trait]
    impl WorkloadRuntime for SlowRuntime {
        async fn ping(&self) -> anyhow::Result<()> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        }

        async fn descriptor_exists(&self) -> anyhow::Result<bool> {
            Ok(true)
        }

        async fn is_running(&self) -> anyhow::Result<bool> {
            Ok(true)
        }

        async fn install(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn stop(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct NoBrowser;

    impl ExternalUi for NoBrowser {
        fn open(&self, _url: &str) {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_refresh_ends_watch() {
        let controller =
            LifecycleController::new(Arc::new(SlowRuntime), NoBrowser, "http://localhost:8080");
        let shutdown = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        };
        let mut printed = 0;

        let result = tokio::time::timeout(
            Duration::from_secs(120),
            watch_until(&controller, Duration::from_secs(1), shutdown, |_| printed += 1),
        )
        .await;

        assert!(matches!(result, Ok(Ok(()))));
        assert_eq!(printed, 1);
    }

    #[test]
    fn test_status_report_json() {
        let status = Status::available(true, true);
        let json = serde_json::to_value(StatusReport::new(&status)).unwrap();

        assert_eq!(json["runtime_available"], true);
        assert_eq!(json["running"], true);
        assert_eq!(json["state"], "Running");
        assert_eq!(json["summary"], "Running");
        assert_eq!(json["affordances"]["can_install"], false);
        assert_eq!(json["affordances"]["can_stop"], true);
        assert_eq!(json["affordances"]["can_open"], true);
    }
}
