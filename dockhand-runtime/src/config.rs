//! Runtime configuration
//!
//! Defines which container engine to drive, where the workload's
//! descriptor lives, how the workload is identified, and the timing
//! parameters for probes, operations and refresh loops.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::RuntimeError;

/// Supported container engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Docker,
    Podman,
}

impl Engine {
    /// Name of the executable on PATH
    pub fn binary(&self) -> &'static str {
        match self {
            Engine::Docker => "docker",
            Engine::Podman => "podman",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.binary())
    }
}

impl FromStr for Engine {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docker" => Ok(Engine::Docker),
            "podman" => Ok(Engine::Podman),
            other => Err(RuntimeError::InvalidConfig(format!(
                "unknown engine '{}', expected docker or podman",
                other
            ))),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Container engine to drive
    pub engine: Engine,

    /// Path of the compose file describing the workload
    pub compose_file: PathBuf,

    /// Compose project name
    pub project: String,

    /// Compose service that makes up the workload
    pub service: String,

    /// URL of the workload's UI (e.g., "http://localhost:8080")
    pub ui_url: String,

    /// Upper bound for each individual probe
    pub probe_timeout: Duration,

    /// Upper bound for install/stop
    pub operation_timeout: Duration,

    /// How often `watch` refreshes the status
    pub watch_interval: Duration,
}

impl RuntimeConfig {
    /// Creates a new configuration with defaults
    pub fn new(compose_file: impl Into<PathBuf>, service: impl Into<String>) -> Self {
        Self {
            engine: Engine::Docker,
            compose_file: compose_file.into(),
            project: "dockhand".to_string(),
            service: service.into(),
            ui_url: "http://localhost:8080".to_string(),
            probe_timeout: Duration::from_secs(5),
            operation_timeout: Duration::from_secs(300), // 5 minutes, image pulls can be slow
            watch_interval: Duration::from_secs(5),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - DOCKHAND_ENGINE (docker | podman, default: docker)
    /// - DOCKHAND_COMPOSE_FILE (default: docker-compose.yml)
    /// - DOCKHAND_PROJECT (default: dockhand)
    /// - DOCKHAND_SERVICE (default: app)
    /// - DOCKHAND_UI_URL (default: http://localhost:8080)
    /// - DOCKHAND_PROBE_TIMEOUT (seconds, default: 5)
    /// - DOCKHAND_OPERATION_TIMEOUT (seconds, default: 300)
    /// - DOCKHAND_WATCH_INTERVAL (seconds, default: 5)
    pub fn from_env() -> Result<Self, RuntimeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    ///
    /// Unparseable numbers fall back to defaults; an unknown engine is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuntimeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(engine) = lookup("DOCKHAND_ENGINE") {
            config.engine = engine.parse()?;
        }
        if let Some(file) = lookup("DOCKHAND_COMPOSE_FILE") {
            config.compose_file = PathBuf::from(file);
        }
        if let Some(project) = lookup("DOCKHAND_PROJECT") {
            config.project = project;
        }
        if let Some(service) = lookup("DOCKHAND_SERVICE") {
            config.service = service;
        }
        if let Some(url) = lookup("DOCKHAND_UI_URL") {
            config.ui_url = url;
        }

        let seconds = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };
        config.probe_timeout = seconds("DOCKHAND_PROBE_TIMEOUT", config.probe_timeout);
        config.operation_timeout = seconds("DOCKHAND_OPERATION_TIMEOUT", config.operation_timeout);
        config.watch_interval = seconds("DOCKHAND_WATCH_INTERVAL", config.watch_interval);

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), RuntimeError> {
        let invalid = |msg: &str| Err(RuntimeError::InvalidConfig(msg.to_string()));

        if self.compose_file.as_os_str().is_empty() {
            return invalid("compose_file cannot be empty");
        }

        if self.project.trim().is_empty() {
            return invalid("project cannot be empty");
        }

        if self.service.trim().is_empty() {
            return invalid("service cannot be empty");
        }

        if !self.ui_url.starts_with("http://") && !self.ui_url.starts_with("https://") {
            return invalid("ui_url must start with http:// or https://");
        }

        if self.probe_timeout.is_zero() {
            return invalid("probe_timeout must be greater than 0");
        }

        if self.operation_timeout.is_zero() {
            return invalid("operation_timeout must be greater than 0");
        }

        if self.watch_interval.is_zero() {
            return invalid("watch_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new("docker-compose.yml", "app")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RuntimeConfig::default();
        assert_eq!(config.engine, Engine::Docker);
        assert_eq!(config.compose_file, PathBuf::from("docker-compose.yml"));
        assert_eq!(config.service, "app");
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
        assert_eq!(config.operation_timeout, Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("DOCKHAND_ENGINE", "Podman"),
            ("DOCKHAND_COMPOSE_FILE", "/srv/app/compose.yaml"),
            ("DOCKHAND_SERVICE", "web"),
            ("DOCKHAND_UI_URL", "https://localhost:8443"),
            ("DOCKHAND_OPERATION_TIMEOUT", "60"),
            ("DOCKHAND_WATCH_INTERVAL", "not-a-number"),
        ]))
        .unwrap();

        assert_eq!(config.engine, Engine::Podman);
        assert_eq!(config.compose_file, PathBuf::from("/srv/app/compose.yaml"));
        assert_eq!(config.service, "web");
        assert_eq!(config.ui_url, "https://localhost:8443");
        assert_eq!(config.operation_timeout, Duration::from_secs(60));
        assert_eq!(config.watch_interval, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_engine_is_rejected() {
        let result = RuntimeConfig::from_lookup(lookup(&[("DOCKHAND_ENGINE", "containerd")]));
        assert!(matches!(result, Err(RuntimeError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_validation() {
        let mut config = RuntimeConfig::default();

        config.service = String::new();
        assert!(config.validate().is_err());
        config.service = "app".to_string();

        config.ui_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());
        config.ui_url = "http://localhost:8080".to_string();

        config.probe_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
        config.probe_timeout = Duration::from_secs(1);

        assert!(config.validate().is_ok());
    }
}
