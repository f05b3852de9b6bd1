//! Terminal tool: run a shell command after confirmation negotiation

use super::trash::SafeDelete;
use lmagent_application::{CommandError, CommandRunner, ConfirmationNegotiator};
use lmagent_domain::safety::Resolution;
use lmagent_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Tool name constant
pub const TERMINAL: &str = "terminal";

/// Get the tool definition for terminal
pub fn terminal_definition() -> ToolDefinition {
    ToolDefinition::new(
        TERMINAL,
        "Execute terminal/shell commands with smart confirmation for destructive operations",
    )
    .with_parameter(ToolParameter::new("command", "The shell command to execute", true))
}

pub struct TerminalTool {
    negotiator: ConfirmationNegotiator,
    runner: Arc<dyn CommandRunner>,
    safe_delete: Arc<SafeDelete>,
    timeout: Duration,
}

impl TerminalTool {
    pub fn new(
        negotiator: ConfirmationNegotiator,
        runner: Arc<dyn CommandRunner>,
        safe_delete: Arc<SafeDelete>,
        timeout: Duration,
    ) -> Self {
        Self {
            negotiator,
            runner,
            safe_delete,
            timeout,
        }
    }

    /// Execute the terminal tool.
    ///
    /// A destructive command runs only once the negotiator resolves it; a
    /// declined one yields a `CANCELLED` failure and never reaches the shell.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();

        let command = match call.require("command") {
            Ok(c) => c,
            Err(e) => return ToolResult::failure(TERMINAL, ToolError::invalid_argument(e)),
        };

        let resolution = match self.negotiator.negotiate(command).await {
            Ok(r) => r,
            Err(_) => return ToolResult::failure(TERMINAL, ToolError::cancelled()),
        };

        let result = match resolution {
            Resolution::Execute => self.run(command).await,
            Resolution::SafeDelete(plan) => {
                match self.safe_delete.delete_matching(&plan.find_expression()).await {
                    Ok(report) => {
                        let mut result = ToolResult::success(TERMINAL, report.message());
                        result.metadata.file_count = Some(report.moved());
                        result
                    }
                    Err(e) => ToolResult::failure(TERMINAL, e),
                }
            }
        };

        result.with_duration(start.elapsed().as_millis() as u64)
    }

    async fn run(&self, command: &str) -> ToolResult {
        debug!(command = %command, "Executing terminal command");
        match self.runner.run(command, self.timeout).await {
            Ok(output) => {
                let mut result = ToolResult::success(TERMINAL, output.summary());
                result.metadata.exit_code = output.exit_code;
                result
            }
            Err(e @ CommandError::Timeout { .. }) => {
                ToolResult::failure(TERMINAL, ToolError::timeout(e.to_string()))
            }
            Err(e) => ToolResult::failure(
                TERMINAL,
                ToolError::execution_failed(format!(
                    "Error executing command '{}': {}",
                    command, e
                )),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::trash::TrashConfig;
    use async_trait::async_trait;
    use lmagent_application::{
        AutoApproveConfirmation, AutoRejectConfirmation, CommandOutput, ConfirmationPort,
    };
    use std::sync::Mutex;

    /// Records every command instead of running it
    #[derive(Default)]
    struct CountingRunner {
        commands: Mutex<Vec<String>>,
        timeout: bool,
    }

    impl CountingRunner {
        fn timing_out() -> Self {
            Self {
                timeout: true,
                ..Default::default()
            }
        }

        fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for CountingRunner {
        async fn run(
            &self,
            command: &str,
            timeout: Duration,
        ) -> Result<CommandOutput, CommandError> {
            self.commands.lock().unwrap().push(command.to_string());
            if self.timeout {
                return Err(CommandError::Timeout {
                    command: command.to_string(),
                    secs: timeout.as_secs(),
                });
            }
            Ok(CommandOutput {
                exit_code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    fn tool(port: Arc<dyn ConfirmationPort>, runner: Arc<CountingRunner>) -> TerminalTool {
        let safe_delete = Arc::new(SafeDelete::new(
            runner.clone(),
            TrashConfig::in_dir(std::env::temp_dir().join("lmagent-test-trash")),
            Duration::from_secs(30),
        ));
        TerminalTool::new(
            ConfirmationNegotiator::new(port),
            runner,
            safe_delete,
            Duration::from_secs(30),
        )
    }

    fn call(command: &str) -> ToolCall {
        ToolCall::new(TERMINAL).with_arg("command", command)
    }

    #[tokio::test]
    async fn test_declined_command_never_runs() {
        let runner = Arc::new(CountingRunner::default());
        let terminal = tool(Arc::new(AutoRejectConfirmation), runner.clone());

        let result = terminal.execute(&call("rm -rf build")).await;

        assert!(result.is_cancelled());
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_command_runs_once() {
        let runner = Arc::new(CountingRunner::default());
        let terminal = tool(Arc::new(AutoApproveConfirmation), runner.clone());

        let result = terminal.execute(&call("rm -rf build")).await;

        assert!(result.is_success());
        assert_eq!(runner.commands(), vec!["rm -rf build".to_string()]);
        assert_eq!(
            result.output(),
            Some("Command executed successfully (no output)")
        );
        assert_eq!(result.metadata.exit_code, Some(0));
    }

    #[tokio::test]
    async fn test_safe_command_skips_confirmation() {
        let runner = Arc::new(CountingRunner::default());
        let terminal = tool(Arc::new(AutoRejectConfirmation), runner.clone());

        let result = terminal.execute(&call("ls -la")).await;

        assert!(result.is_success());
        assert_eq!(runner.commands(), vec!["ls -la".to_string()]);
    }

    #[tokio::test]
    async fn test_safer_alternative_runs_find_not_rm() {
        let runner = Arc::new(CountingRunner::default());
        let terminal = tool(Arc::new(AutoApproveConfirmation), runner.clone());

        let result = terminal
            .execute(&call(
                r"find /tmp/logs -name '*.log' -mtime +7 -exec rm {} \;",
            ))
            .await;

        assert!(result.is_success());
        let commands = runner.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0],
            "find /tmp/logs -type f -name '*.log' -mtime +7 2>/dev/null"
        );
        assert_eq!(
            result.output(),
            Some("No files found matching pattern: /tmp/logs -type f -name '*.log' -mtime +7")
        );
    }

    #[tokio::test]
    async fn test_timeout_is_reported() {
        let runner = Arc::new(CountingRunner::timing_out());
        let terminal = tool(Arc::new(AutoRejectConfirmation), runner);

        let result = terminal.execute(&call("sleep 60")).await;

        let error = result.error().unwrap();
        assert_eq!(error.code, "TIMEOUT");
        assert_eq!(error.message, "Command 'sleep 60' timed out after 30 seconds");
    }

    #[tokio::test]
    async fn test_missing_command() {
        let runner = Arc::new(CountingRunner::default());
        let terminal = tool(Arc::new(AutoApproveConfirmation), runner.clone());

        let result = terminal.execute(&ToolCall::new(TERMINAL)).await;

        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        assert!(runner.commands().is_empty());
    }
}
