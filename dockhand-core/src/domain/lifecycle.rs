//! Lifecycle states and operation outcomes

use serde::{Deserialize, Serialize};

/// Logical state of the managed workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// The container runtime did not answer
    RuntimeUnavailable,

    /// Runtime is up, workload is not running
    Stopped,

    /// Workload is running
    Running,

    /// An install/start call is in flight
    Installing,

    /// A stop call is in flight
    Stopping,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::RuntimeUnavailable => write!(f, "Container runtime unavailable"),
            LifecycleState::Stopped => write!(f, "Stopped"),
            LifecycleState::Running => write!(f, "Running"),
            LifecycleState::Installing => write!(f, "Installing"),
            LifecycleState::Stopping => write!(f, "Stopping"),
        }
    }
}

/// What the controller is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// No operation in flight
    #[default]
    Idle,

    /// install() is waiting on the runtime
    Installing,

    /// stop() is waiting on the runtime
    Stopping,
}

impl Phase {
    /// Whether an operation is in flight; callers disable every control
    pub fn is_busy(&self) -> bool {
        !matches!(self, Phase::Idle)
    }

    /// Transient lifecycle state for a busy phase
    pub fn busy_state(&self) -> Option<LifecycleState> {
        match self {
            Phase::Idle => None,
            Phase::Installing => Some(LifecycleState::Installing),
            Phase::Stopping => Some(LifecycleState::Stopping),
        }
    }
}

/// Successful result of a mutating operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The workload was installed and started
    Installed,

    /// install() found the workload already running; nothing was done
    AlreadyRunning,

    /// The workload was stopped
    Stopped,

    /// stop() found the workload not running; nothing was done
    AlreadyStopped,
}

impl Outcome {
    /// Whether the runtime was actually asked to change anything
    pub fn changed(&self) -> bool {
        matches!(self, Outcome::Installed | Outcome::Stopped)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Installed => write!(f, "Workload installed and started"),
            Outcome::AlreadyRunning => write!(f, "Workload is already running"),
            Outcome::Stopped => write!(f, "Workload stopped"),
            Outcome::AlreadyStopped => write!(f, "Workload is not running"),
        }
    }
}
