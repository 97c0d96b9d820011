//! Compose-based container runtime
//!
//! Implements the core's runtime capability by shelling out to the
//! engine CLI:
//! - `<engine> info` for liveness
//! - `<engine> compose config` to resolve the descriptor
//! - `<engine> ps` filtered by compose labels for the running state
//! - `<engine> compose up -d` / `<engine> compose stop` for transitions

use anyhow::bail;
use async_trait::async_trait;
use dockhand_core::WorkloadRuntime;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};

/// Why the engine is being invoked
///
/// Probes are read-only and are killed if the caller gives up on them.
/// Operations are left running when the caller times out, so a slow
/// `compose up` still completes and the next probe reports the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Invocation {
    Probe,
    Operation,
}

impl Invocation {
    fn kill_on_drop(&self) -> bool {
        matches!(self, Invocation::Probe)
    }
}

/// Captured result of one engine invocation
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runtime backend for a single compose service
#[derive(Debug, Clone)]
pub struct ComposeRuntime {
    config: RuntimeConfig,
}

impl ComposeRuntime {
    /// Creates a new compose runtime
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    fn ping_args(&self) -> Vec<String> {
        vec!["info".to_string()]
    }

    fn compose_args(&self, subcommand: &[&str]) -> Vec<String> {
        let mut args = vec![
            "compose".to_string(),
            "-f".to_string(),
            self.config.compose_file.display().to_string(),
            "-p".to_string(),
            self.config.project.clone(),
        ];
        args.extend(subcommand.iter().map(|s| s.to_string()));
        args
    }

    fn config_args(&self) -> Vec<String> {
        self.compose_args(&["config"])
    }

    fn up_args(&self) -> Vec<String> {
        self.compose_args(&["up", "-d", &self.config.service])
    }

    fn stop_args(&self) -> Vec<String> {
        self.compose_args(&["stop", &self.config.service])
    }

    fn ps_args(&self) -> Vec<String> {
        vec![
            "ps".to_string(),
            "--filter".to_string(),
            format!("label=com.docker.compose.project={}", self.config.project),
            "--filter".to_string(),
            format!("label=com.docker.compose.service={}", self.config.service),
            "--filter".to_string(),
            "status=running".to_string(),
            "--format".to_string(),
            "{{.ID}}".to_string(),
        ]
    }

    fn render(&self, args: &[String]) -> String {
        format!("{} {}", self.config.engine.binary(), args.join(" "))
    }

    /// Runs the engine with `args` and captures its output
    ///
    /// Only fails if the process could not be spawned.
    async fn run(&self, args: &[String], invocation: Invocation) -> Result<CommandOutput> {
        let command = self.render(args);
        debug!("Running: {}", command);

        let output = Command::new(self.config.engine.binary())
            .args(args)
            .kill_on_drop(invocation.kill_on_drop())
            .output()
            .await
            .map_err(|source| RuntimeError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stdout.trim().is_empty() {
            debug!("{} stdout: {}", command, stdout.trim());
        }
        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", command, stderr.trim());
        }

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Like [`run`](Self::run) but treats a non-zero exit as an error
    async fn run_checked(
        &self,
        args: &[String],
        invocation: Invocation,
    ) -> Result<CommandOutput> {
        let output = self.run(args, invocation).await?;
        if !output.success() {
            return Err(RuntimeError::CommandFailed {
                command: self.render(args),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// Container IDs printed by a filtered `ps`, one per line
fn parse_container_ids(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[async_trait]
impl WorkloadRuntime for ComposeRuntime {
    async fn ping(&self) -> anyhow::Result<()> {
        self.run_checked(&self.ping_args(), Invocation::Probe).await?;
        Ok(())
    }

    async fn descriptor_exists(&self) -> anyhow::Result<bool> {
        if !self.config.compose_file.is_file() {
            debug!(
                "Compose file {} not found",
                self.config.compose_file.display()
            );
            return Ok(false);
        }

        let output = self.run(&self.config_args(), Invocation::Probe).await?;
        Ok(output.success())
    }

    async fn is_running(&self) -> anyhow::Result<bool> {
        let output = self.run_checked(&self.ps_args(), Invocation::Probe).await?;
        let ids = parse_container_ids(&output.stdout);
        debug!(
            "Service {} has {} running container(s)",
            self.config.service,
            ids.len()
        );
        Ok(!ids.is_empty())
    }

    async fn install(&self) -> anyhow::Result<()> {
        info!(
            "Starting service {} from {}",
            self.config.service,
            self.config.compose_file.display()
        );
        self.run_checked(&self.up_args(), Invocation::Operation).await?;

        if !self.is_running().await? {
            bail!(
                "service {} did not reach the running state",
                self.config.service
            );
        }
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        info!("Stopping service {}", self.config.service);
        self.run_checked(&self.stop_args(), Invocation::Operation).await?;
        Ok(())
    }
}
