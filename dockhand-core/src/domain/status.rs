//! Status snapshot and derived UI affordances

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lifecycle::LifecycleState;

/// One observation of the runtime and the workload
///
/// `descriptor_present` and `running` are `None` when the runtime was
/// unavailable and the dependent probes were skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Whether the container runtime answered its liveness probe
    pub runtime_available: bool,

    /// Whether the deployment descriptor resolved
    pub descriptor_present: Option<bool>,

    /// Whether the workload has a running container
    pub running: Option<bool>,

    /// When the probes were taken
    pub observed_at: DateTime<Utc>,
}

/// Which UI controls should be enabled for a given status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Affordances {
    pub can_install: bool,
    pub can_stop: bool,
    pub can_open: bool,
}

impl Status {
    /// Snapshot for a runtime that did not answer
    pub fn unavailable() -> Self {
        Self {
            runtime_available: false,
            descriptor_present: None,
            running: None,
            observed_at: Utc::now(),
        }
    }

    /// Snapshot for a runtime that answered, with both dependent probes taken
    pub fn available(descriptor_present: bool, running: bool) -> Self {
        Self {
            runtime_available: true,
            descriptor_present: Some(descriptor_present),
            running: Some(running),
            observed_at: Utc::now(),
        }
    }

    /// Running state, with "not probed" counting as not running
    pub fn is_running(&self) -> bool {
        self.runtime_available && self.running.unwrap_or(false)
    }

    /// Descriptor presence, with "not probed" counting as absent
    pub fn has_descriptor(&self) -> bool {
        self.runtime_available && self.descriptor_present.unwrap_or(false)
    }

    /// Derives the enabled controls for this snapshot
    ///
    /// Descriptor presence does not gate installing.
    pub fn affordances(&self) -> Affordances {
        let running = self.is_running();
        Affordances {
            can_install: self.runtime_available && !running,
            can_stop: self.runtime_available && running,
            can_open: running,
        }
    }

    /// Stable lifecycle state this snapshot corresponds to
    pub fn state(&self) -> LifecycleState {
        if !self.runtime_available {
            LifecycleState::RuntimeUnavailable
        } else if self.is_running() {
            LifecycleState::Running
        } else {
            LifecycleState::Stopped
        }
    }

    /// Single human-readable summary line
    pub fn summary(&self) -> String {
        match self.state() {
            LifecycleState::Stopped if !self.has_descriptor() => {
                "Stopped (not installed)".to_string()
            }
            state => state.to_string(),
        }
    }

    /// Compares the observed facts, ignoring when they were taken
    pub fn same_observation(&self, other: &Status) -> bool {
        self.runtime_available == other.runtime_available
            && self.descriptor_present == other.descriptor_present
            && self.running == other.running
    }
}
