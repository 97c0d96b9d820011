//! Error types for lifecycle control

use thiserror::Error;

/// Result type alias for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Errors surfaced by the lifecycle core
///
/// The cause of a failed operation is opaque to the core; it is carried
/// as a rendered message so callers can display it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// A probe could not determine the truth.
    ///
    /// Never returned from a probe. Probes log this and report `false`.
    #[error("{probe} probe failed: {reason}")]
    ProbeFailure {
        /// Name of the probe that failed
        probe: &'static str,
        /// Underlying cause
        reason: String,
    },

    /// Install/start did not complete
    #[error("install failed: {reason}")]
    InstallFailed {
        /// Underlying cause
        reason: String,
    },

    /// Stop did not complete
    #[error("stop failed: {reason}")]
    StopFailed {
        /// Underlying cause
        reason: String,
    },
}

impl LifecycleError {
    /// Create an install failure from any displayable cause
    pub fn install_failed(reason: impl Into<String>) -> Self {
        Self::InstallFailed {
            reason: reason.into(),
        }
    }

    /// Create a stop failure from any displayable cause
    pub fn stop_failed(reason: impl Into<String>) -> Self {
        Self::StopFailed {
            reason: reason.into(),
        }
    }
}
