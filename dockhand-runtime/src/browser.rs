//! Platform browser opener
//!
//! Spawns the desktop's URL handler without waiting for it. The child is
//! reaped on a background thread so repeated opens leave no zombies.

use dockhand_core::ExternalUi;
use std::io;
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Opens URLs with `xdg-open`, `open` or `start` depending on the platform
#[derive(Debug, Clone, Default)]
pub struct SystemBrowser {}

impl SystemBrowser {
    pub fn new() -> Self {
        Self {}
    }
}

/// Program and arguments that open `url` on the current platform
fn opener_command(url: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "macos") {
        ("open", vec![url.to_string()])
    } else if cfg!(target_os = "windows") {
        (
            "cmd",
            vec![
                "/C".to_string(),
                "start".to_string(),
                String::new(),
                url.to_string(),
            ],
        )
    } else {
        ("xdg-open", vec![url.to_string()])
    }
}

/// Spawns `program` detached from our stdio and reaps it in the background
fn launch(program: &str, args: &[String]) -> io::Result<std::thread::JoinHandle<()>> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let program = program.to_string();
    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => debug!("{} exited with {}", program, status),
        Ok(_) => {}
        Err(e) => warn!("Failed to wait for {}: {}", program, e),
    }))
}

impl ExternalUi for SystemBrowser {
    fn open(&self, url: &str) {
        let (program, args) = opener_command(url);
        debug!("Launching {} {:?}", program, args);

        if let Err(e) = launch(program, &args) {
            warn!("Failed to open {} with {}: {}", url, program, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_passes_url_last() {
        let (_, args) = opener_command("http://localhost:8080");
        assert_eq!(args.last().map(String::as_str), Some("http://localhost:8080"));
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_reaps_child() {
        let reaper = launch("true", &[]).unwrap();
        reaper.join().unwrap();
    }

    #[test]
    fn test_launch_missing_program_fails() {
        assert!(launch("dockhand-no-such-opener", &[]).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_uses_xdg_open() {
        let (program, args) = opener_command("http://localhost:8080");
        assert_eq!(program, "xdg-open");
        assert_eq!(args.len(), 1);
    }
}
