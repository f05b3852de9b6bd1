//! Shell command runner port

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Captured result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Text reported back to the model.
    ///
    /// Success: stdout, or a fixed note when there is none. Failure: stderr,
    /// or the exit code when stderr is empty.
    pub fn summary(&self) -> String {
        if self.success() {
            if self.stdout.trim().is_empty() {
                "Command executed successfully (no output)".to_string()
            } else {
                self.stdout.clone()
            }
        } else if self.stderr.trim().is_empty() {
            format!("Command failed (exit code {})", self.exit_code.unwrap_or(-1))
        } else {
            self.stderr.clone()
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Command '{command}' timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    #[error("Failed to spawn command: {0}")]
    Spawn(String),
}

/// Port for running a command line through the system shell
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str, timeout: Duration) -> Result<CommandOutput, CommandError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let ok = CommandOutput {
            exit_code: Some(0),
            stdout: "hello\n".to_string(),
            stderr: String::new(),
        };
        assert_eq!(ok.summary(), "hello\n");

        let silent = CommandOutput {
            exit_code: Some(0),
            ..Default::default()
        };
        assert_eq!(silent.summary(), "Command executed successfully (no output)");

        let failed = CommandOutput {
            exit_code: Some(2),
            stdout: "partial".to_string(),
            stderr: "ls: cannot access 'x'".to_string(),
        };
        assert_eq!(failed.summary(), "ls: cannot access 'x'");

        let quiet_failure = CommandOutput {
            exit_code: Some(1),
            ..Default::default()
        };
        assert_eq!(quiet_failure.summary(), "Command failed (exit code 1)");
    }

    #[test]
    fn test_timeout_message() {
        let err = CommandError::Timeout {
            command: "sleep 60".to_string(),
            secs: 30,
        };
        assert_eq!(err.to_string(), "Command 'sleep 60' timed out after 30 seconds");
    }
}
