//! Dockhand Runtime
//!
//! Concrete capabilities for the lifecycle core:
//! - `ComposeRuntime`: drives the workload through the `docker` or
//!   `podman` CLI and its compose subcommand
//! - `SystemBrowser`: opens the workload UI with the platform opener
//! - `RuntimeConfig`: engine, descriptor and timing settings

pub mod browser;
pub mod config;
pub mod engine;
pub mod error;

pub use browser::SystemBrowser;
pub use config::{Engine, RuntimeConfig};
pub use engine::ComposeRuntime;
pub use error::{Result, RuntimeError};
