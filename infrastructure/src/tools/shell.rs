//! System shell adapter for [`CommandRunner`]
//!
//! Commands run through `sh -c` (`cmd /C` on Windows) with stdout and
//! stderr captured. A command that outlives its timeout is killed.

use async_trait::async_trait;
use lmagent_application::{CommandError, CommandOutput, CommandRunner};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct SystemShell {
    /// Working directory for commands (None = current directory)
    working_dir: Option<String>,
}

impl SystemShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn build(&self, command: &str) -> Command {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", command]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", command]);
            c
        };

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for SystemShell {
    async fn run(&self, command: &str, timeout: Duration) -> Result<CommandOutput, CommandError> {
        debug!(command = %command, timeout_secs = timeout.as_secs(), "Running shell command");

        let child = self
            .build(command)
            .spawn()
            .map_err(|e| CommandError::Spawn(e.to_string()))?;

        // Dropping the output future on timeout kills the child (kill_on_drop)
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| CommandError::Spawn(e.to_string()))?,
            Err(_) => {
                return Err(CommandError::Timeout {
                    command: command.to_string(),
                    secs: timeout.as_secs(),
                });
            }
        };

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
