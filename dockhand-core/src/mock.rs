//! Scripted runtime for unit tests

use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use crate::runtime::{ExternalUi, WorkloadRuntime};

/// What the fake runtime currently reports, and which calls should fail
#[derive(Debug, Default, Clone)]
pub struct MockState {
    pub runtime_up: bool,
    pub descriptor: bool,
    pub running: bool,
    pub ping_error: bool,
    pub descriptor_error: bool,
    pub running_error: bool,
    pub install_error: bool,
    pub stop_error: bool,
    pub operation_delay: Option<Duration>,
    pub probe_delay: Option<Duration>,
}

/// In-memory runtime that records every call it receives
#[derive(Debug, Default)]
pub struct MockRuntime {
    state: Mutex<MockState>,
    calls: Mutex<Vec<&'static str>>,
}

impl MockRuntime {
    pub fn new(state: MockState) -> Self {
        Self {
            state: Mutex::new(state),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Runtime down
    pub fn down() -> Self {
        Self::new(MockState::default())
    }

    /// Runtime up with the given descriptor and running flags
    pub fn up(descriptor: bool, running: bool) -> Self {
        Self::new(MockState {
            runtime_up: true,
            descriptor,
            running,
            ..Default::default()
        })
    }

    pub fn update(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn snapshot(&self) -> MockState {
        self.state.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    fn record(&self, call: &'static str) -> MockState {
        self.calls.lock().unwrap().push(call);
        self.snapshot()
    }
}

#[async_trait]
impl WorkloadRuntime for MockRuntime {
    async fn ping(&self) -> Result<()> {
        let state = self.record("ping");
        if let Some(delay) = state.probe_delay {
            tokio::time::sleep(delay).await;
        }
        if state.ping_error {
            bail!("socket closed");
        }
        if !state.runtime_up {
            bail!("cannot connect to the container runtime");
        }
        Ok(())
    }

    async fn descriptor_exists(&self) -> Result<bool> {
        let state = self.record("descriptor");
        if state.descriptor_error {
            bail!("descriptor lookup failed");
        }
        Ok(state.descriptor)
    }

    async fn is_running(&self) -> Result<bool> {
        let state = self.record("running");
        if let Some(delay) = state.probe_delay {
            tokio::time::sleep(delay).await;
        }
        if state.running_error {
            bail!("listing containers failed");
        }
        Ok(state.running)
    }

    async fn install(&self) -> Result<()> {
        let state = self.record("install");
        if let Some(delay) = state.operation_delay {
            tokio::time::sleep(delay).await;
        }
        if state.install_error {
            bail!("image pull failed");
        }
        self.update(|s| {
            s.descriptor = true;
            s.running = true;
        });
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        let state = self.record("stop");
        if let Some(delay) = state.operation_delay {
            tokio::time::sleep(delay).await;
        }
        if state.stop_error {
            bail!("container refused to stop");
        }
        self.update(|s| s.running = false);
        Ok(())
    }
}

/// Browser double that remembers the URLs it was asked to open
#[derive(Debug, Default)]
pub struct RecordingUi {
    opened: Mutex<Vec<String>>,
}

impl RecordingUi {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl ExternalUi for RecordingUi {
    fn open(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

impl ExternalUi for std::sync::Arc<RecordingUi> {
    fn open(&self, url: &str) {
        self.as_ref().open(url);
    }
}
