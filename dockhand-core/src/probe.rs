//! Probe set
//!
//! Three read-only checks against the runtime:
//! - runtime availability
//! - descriptor presence
//! - workload running-state
//!
//! Every probe fails closed. An error or a timeout is logged as a
//! `ProbeFailure` and reported as `false`; nothing propagates to the caller.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::status::Status;
use crate::error::LifecycleError;
use crate::runtime::WorkloadRuntime;

/// Fail-closed probes over a [`WorkloadRuntime`]
pub struct ProbeSet<R: WorkloadRuntime> {
    runtime: Arc<R>,
    timeout: Option<Duration>,
}

impl<R: WorkloadRuntime> ProbeSet<R> {
    /// Creates a probe set without a per-probe timeout
    pub fn new(runtime: Arc<R>) -> Self {
        Self {
            runtime,
            timeout: None,
        }
    }

    /// Bounds every individual probe by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether the container runtime answers its liveness check
    pub async fn runtime_available(&self) -> bool {
        self.guard("runtime", async { self.runtime.ping().await.map(|_| true) })
            .await
    }

    /// Whether the deployment descriptor resolves
    ///
    /// Only meaningful when [`runtime_available`](Self::runtime_available)
    /// returned `true`.
    pub async fn descriptor_exists(&self) -> bool {
        self.guard("descriptor", self.runtime.descriptor_exists())
            .await
    }

    /// Whether the workload has a running container
    ///
    /// Only meaningful when [`runtime_available`](Self::runtime_available)
    /// returned `true`.
    pub async fn workload_running(&self) -> bool {
        self.guard("running", self.runtime.is_running()).await
    }

    /// Running state, or `None` when the runtime could not say
    ///
    /// For callers that must not act on a fail-closed `false`.
    pub async fn try_workload_running(&self) -> Option<bool> {
        self.check("running", self.runtime.is_running()).await
    }

    /// Takes a full status snapshot
    ///
    /// The runtime is checked first. The descriptor and running probes only
    /// run when it answered, and they run as separate calls so a failure of
    /// one does not hide the result of the other.
    pub async fn refresh(&self) -> Status {
        if !self.runtime_available().await {
            debug!("Runtime unavailable, skipping dependent probes");
            return Status::unavailable();
        }

        let (descriptor, running) =
            tokio::join!(self.descriptor_exists(), self.workload_running());

        debug!(descriptor, running, "Probe cycle complete");
        Status::available(descriptor, running)
    }

    async fn guard<F>(&self, probe: &'static str, check: F) -> bool
    where
        F: Future<Output = anyhow::Result<bool>>,
    {
        self.check(probe, check).await.unwrap_or(false)
    }

    async fn check<F>(&self, probe: &'static str, check: F) -> Option<bool>
    where
        F: Future<Output = anyhow::Result<bool>>,
    {
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, check).await {
                Ok(result) => result,
                Err(_) => Err(anyhow::anyhow!("timed out after {:?}", limit)),
            },
            None => check.await,
        };

        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let failure = LifecycleError::ProbeFailure {
                    probe,
                    reason: format!("{:#}", e),
                };
                warn!("{}", failure);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRuntime;

    #[tokio::test]
    async fn test_runtime_down_short_circuits() {
        let runtime = Arc::new(MockRuntime::down());
        let probes = ProbeSet::new(runtime.clone());

        let status = probes.refresh().await;

        assert!(!status.runtime_available);
        assert_eq!(status.descriptor_present, None);
        assert_eq!(status.running, None);
        assert_eq!(runtime.calls(), vec!["ping"]);
    }

    #[tokio::test]
    async fn test_runtime_up_runs_all_probes() {
        let runtime = Arc::new(MockRuntime::up(true, true));
        let probes = ProbeSet::new(runtime.clone());

        let status = probes.refresh().await;

        assert_eq!(
            status,
            Status {
                observed_at: status.observed_at,
                ..Status::available(true, true)
            }
        );
        assert_eq!(runtime.count("ping"), 1);
        assert_eq!(runtime.count("descriptor"), 1);
        assert_eq!(runtime.count("running"), 1);
    }

    #[tokio::test]
    async fn test_ping_error_fails_closed() {
        let runtime = Arc::new(MockRuntime::up(true, true));
        runtime.update(|s| s.ping_error = true);
        let probes = ProbeSet::new(runtime.clone());

        assert!(!probes.runtime_available().await);
        let status = probes.refresh().await;
        assert!(!status.runtime_available);
        assert_eq!(runtime.count("running"), 0);
    }

    #[tokio::test]
    async fn test_descriptor_failure_does_not_mask_running() {
        let runtime = Arc::new(MockRuntime::up(true, true));
        runtime.update(|s| s.descriptor_error = true);
        let probes = ProbeSet::new(runtime);

        let status = probes.refresh().await;

        assert_eq!(status.descriptor_present, Some(false));
        assert_eq!(status.running, Some(true));
    }

    #[tokio::test]
    async fn test_running_failure_does_not_mask_descriptor() {
        let runtime = Arc::new(MockRuntime::up(true, true));
        runtime.update(|s| s.running_error = true);
        let probes = ProbeSet::new(runtime);

        let status = probes.refresh().await;

        assert_eq!(status.descriptor_present, Some(true));
        assert_eq!(status.running, Some(false));
        assert!(!status.affordances().can_open);
    }

    #[tokio::test]
    async fn test_try_workload_running_separates_failure_from_false() {
        let runtime = Arc::new(MockRuntime::up(true, false));
        let probes = ProbeSet::new(runtime.clone());
        assert_eq!(probes.try_workload_running().await, Some(false));

        runtime.update(|s| {
            s.running = true;
            s.running_error = true;
        });
        assert_eq!(probes.try_workload_running().await, None);
        assert!(!probes.workload_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probe_timeout_fails_closed() {
        let runtime = Arc::new(MockRuntime::up(true, true));
        runtime.update(|s| s.probe_delay = Some(Duration::from_secs(60)));
        let probes = ProbeSet::new(runtime).with_timeout(Duration::from_secs(1));

        assert!(!probes.runtime_available().await);
        assert!(!probes.workload_running().await);
    }
}
