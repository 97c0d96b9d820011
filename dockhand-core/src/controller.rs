//! Lifecycle controller
//!
//! Drives the workload between `Stopped` and `Running`:
//! - `install()` realizes the descriptor and starts the workload
//! - `stop()` stops the workload, leaving the descriptor intact
//! - `open_external_ui()` hands the UI URL to the browser capability
//!
//! Both mutating operations are idempotent. Neither rolls back nor
//! fabricates state on failure: the next probe cycle is authoritative.
//!
//! Mutating calls take `&mut self`, so one owner can never have two
//! operations in flight at once. The in-flight phase is published on a
//! watch channel so a caller can render `Installing` / `Stopping` and
//! disable its controls while it waits.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

use crate::domain::lifecycle::{LifecycleState, Outcome, Phase};
use crate::domain::status::Status;
use crate::error::{LifecycleError, Result};
use crate::probe::ProbeSet;
use crate::runtime::{ExternalUi, WorkloadRuntime};

/// Controller for a single workload
pub struct LifecycleController<R: WorkloadRuntime, U: ExternalUi> {
    runtime: Arc<R>,
    probes: ProbeSet<R>,
    ui: U,
    ui_url: String,
    operation_timeout: Option<Duration>,
    phase: watch::Sender<Phase>,
}

/// Returns the phase to `Idle` when an operation ends, however it ends
struct PhaseGuard<'a>(&'a watch::Sender<Phase>);

impl<'a> PhaseGuard<'a> {
    fn enter(sender: &'a watch::Sender<Phase>, phase: Phase) -> Self {
        sender.send_replace(phase);
        Self(sender)
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(Phase::Idle);
    }
}

impl<R: WorkloadRuntime, U: ExternalUi> LifecycleController<R, U> {
    /// Creates a new controller
    ///
    /// # Arguments
    /// * `runtime` - Backend used for probes and operations
    /// * `ui` - Capability used to open the workload's UI
    /// * `ui_url` - URL of the workload's UI
    pub fn new(runtime: Arc<R>, ui: U, ui_url: impl Into<String>) -> Self {
        Self {
            probes: ProbeSet::new(Arc::clone(&runtime)),
            runtime,
            ui,
            ui_url: ui_url.into(),
            operation_timeout: None,
            phase: watch::Sender::new(Phase::Idle),
        }
    }

    /// Bounds every individual probe by `timeout`
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probes = self.probes.with_timeout(timeout);
        self
    }

    /// Bounds install/stop by `timeout`
    ///
    /// An operation that exceeds it is reported as failed. The runtime call
    /// is not cancelled and may still finish afterwards; the next probe
    /// will show it.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// What the controller is doing right now
    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Receiver that sees every phase change
    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// URL handed to the external UI capability
    pub fn ui_url(&self) -> &str {
        &self.ui_url
    }

    /// Takes a fresh status snapshot
    pub async fn status(&self) -> Status {
        self.probes.refresh().await
    }

    /// Installs and starts the workload
    ///
    /// Returns `Outcome::AlreadyRunning` without touching the runtime when
    /// the workload is already up. Descriptor presence is not checked.
    pub async fn install(&mut self) -> Result<Outcome> {
        if !self.probes.runtime_available().await {
            let err = LifecycleError::install_failed("container runtime unavailable");
            error!("{}", err);
            return Err(err);
        }

        if self.probes.workload_running().await {
            info!("Workload already running, nothing to install");
            return Ok(Outcome::AlreadyRunning);
        }

        info!(state = %LifecycleState::Installing, "Installing workload");
        let _phase = PhaseGuard::enter(&self.phase, Phase::Installing);
        match bounded(self.operation_timeout, self.runtime.install()).await {
            Ok(()) => {
                info!(state = %LifecycleState::Running, "Workload installed and started");
                Ok(Outcome::Installed)
            }
            Err(reason) => {
                let err = LifecycleError::install_failed(reason);
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Stops the workload
    ///
    /// Returns `Outcome::AlreadyStopped` without touching the runtime when
    /// the workload is observably not running. A runtime that is down or a
    /// run-state query that fails is a `StopFailed`: the workload may
    /// still be up.
    pub async fn stop(&mut self) -> Result<Outcome> {
        if !self.probes.runtime_available().await {
            let err = LifecycleError::stop_failed("container runtime unavailable");
            error!("{}", err);
            return Err(err);
        }

        match self.probes.try_workload_running().await {
            Some(true) => {}
            Some(false) => {
                info!("Workload not running, nothing to stop");
                return Ok(Outcome::AlreadyStopped);
            }
            None => {
                let err = LifecycleError::stop_failed(
                    "could not determine whether the workload is running",
                );
                error!("{}", err);
                return Err(err);
            }
        }

        info!(state = %LifecycleState::Stopping, "Stopping workload");
        let _phase = PhaseGuard::enter(&self.phase, Phase::Stopping);
        match bounded(self.operation_timeout, self.runtime.stop()).await {
            Ok(()) => {
                info!(state = %LifecycleState::Stopped, "Workload stopped");
                Ok(Outcome::Stopped)
            }
            Err(reason) => {
                let err = LifecycleError::stop_failed(reason);
                error!("{}", err);
                Err(err)
            }
        }
    }

    /// Opens the workload's UI if it is running
    ///
    /// Returns whether the open was dispatched. The capability is
    /// fire-and-forget, so `true` says nothing about the browser itself.
    pub async fn open_external_ui(&self) -> bool {
        let status = self.status().await;
        if !status.affordances().can_open {
            info!("Workload not running, not opening {}", self.ui_url);
            return false;
        }

        info!("Opening {}", self.ui_url);
        self.ui.open(&self.ui_url);
        true
    }
}

/// Runs a mutating call under an optional deadline, rendering any failure
async fn bounded<F>(limit: Option<Duration>, operation: F) -> std::result::Result<(), String>
where
    F: Future<Output = anyhow::Result<()>>,
{
    let result = match limit {
        Some(limit) => match tokio::time::timeout(limit, operation).await {
            Ok(result) => result,
            Err(_) => return Err(format!("timed out after {:?}", limit)),
        },
        None => operation.await,
    };

    result.map_err(|e| format!("{:#}", e))
}
