//! Capabilities consumed by the core
//!
//! The container runtime and the browser opener are external
//! collaborators. The core only talks to them through these traits so
//! that backends (docker, podman, test doubles) can be swapped freely.

use anyhow::Result;
use async_trait::async_trait;

/// Control surface of the container runtime for the managed workload
///
/// Every method may fail. Read-only methods are wrapped by
/// [`ProbeSet`](crate::ProbeSet), which fails closed; mutating methods
/// are wrapped by [`LifecycleController`](crate::LifecycleController),
/// which reports failures as `InstallFailed` / `StopFailed`.
#[async_trait]
pub trait WorkloadRuntime: Send + Sync {
    /// Liveness check of the runtime itself
    async fn ping(&self) -> Result<()>;

    /// Checks whether the deployment descriptor can be resolved
    async fn descriptor_exists(&self) -> Result<bool>;

    /// Checks whether the workload currently has a running container
    async fn is_running(&self) -> Result<bool>;

    /// Realizes the descriptor and starts the workload
    ///
    /// Must not return until the workload is observable as running.
    async fn install(&self) -> Result<()>;

    /// Stops the workload, leaving the descriptor in place
    async fn stop(&self) -> Result<()>;
}

/// Opens the workload's user interface outside the process
///
/// Fire-and-forget: implementations log their own problems.
pub trait ExternalUi: Send + Sync {
    /// Opens `url`
    fn open(&self, url: &str);
}
