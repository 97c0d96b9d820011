//! Error types for the container runtime backend

use thiserror::Error;

/// Result type alias for runtime backend operations
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors raised while talking to the container engine
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine binary could not be executed at all
    #[error("Failed to execute '{command}'. Is it installed? ({source})")]
    Spawn {
        /// Rendered command line
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but reported failure
    #[error("'{command}' failed: exit_code={exit_code}, stderr='{stderr}'")]
    CommandFailed {
        /// Rendered command line
        command: String,
        /// Process exit code, -1 if killed by a signal
        exit_code: i32,
        /// Trimmed standard error
        stderr: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
