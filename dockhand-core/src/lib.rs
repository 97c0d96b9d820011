//! Dockhand Core
//!
//! Lifecycle control for a single containerized workload.
//!
//! This crate contains:
//! - Domain types: status snapshots, UI affordances and lifecycle states
//! - Capabilities: the runtime and external UI traits the core consumes
//! - Probe set: fail-closed, read-only checks against the runtime
//! - Lifecycle controller: idempotent install/start and stop operations
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dockhand_core::{ExternalUi, LifecycleController, WorkloadRuntime};
//!
//! async fn cycle<R: WorkloadRuntime, U: ExternalUi>(runtime: Arc<R>, ui: U) {
//!     let mut controller = LifecycleController::new(runtime, ui, "http://localhost:8080");
//!
//!     let status = controller.status().await;
//!     println!("{}", status.summary());
//!
//!     if status.affordances().can_install {
//!         if let Err(e) = controller.install().await {
//!             eprintln!("{}", e);
//!         }
//!     }
//! }
//! ```

pub mod controller;
pub mod domain;
pub mod error;
pub mod probe;
pub mod runtime;

#[cfg(test)]
pub(crate) mod mock;

// Re-export commonly used types
pub use controller::LifecycleController;
pub use domain::lifecycle::{LifecycleState, Outcome, Phase};
pub use domain::status::{Affordances, Status};
pub use error::{LifecycleError, Result};
pub use probe::ProbeSet;
pub use runtime::{ExternalUi, WorkloadRuntime};
