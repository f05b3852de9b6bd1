//! Local tool executor, the concrete implementation of [`ToolExecutorPort`].
//!
//! [`LocalToolExecutor`] bridges the application layer's abstract
//! [`ToolExecutorPort`] with actual system operations: shell commands
//! (behind the confirmation negotiator), file I/O and trash-based deletion.
//!
//! # Execution Paths
//!
//! ```text
//! ToolExecutorPort::execute()
//!   ├─ unknown name / missing argument → failure result
//!   ├─ terminal      → TerminalTool (negotiate, then shell or trash)
//!   ├─ delete_files  → SafeDelete (find, then move to trash)
//!   └─ otherwise     → synchronous file / web_search tools
//! ```

use super::command::{self, TerminalTool};
use super::trash::{SafeDelete, TrashConfig};
use super::{file, web_search};
use async_trait::async_trait;
use lmagent_application::{
    CommandRunner, ConfirmationNegotiator, ConfirmationPort, ToolExecutorPort,
};
use lmagent_domain::tool::{
    entities::{ToolCall, ToolSpec},
    value_objects::{ToolError, ToolResult},
};
use std::sync::Arc;
use std::time::Duration;

/// Executor that runs tools on the local machine.
///
/// Only tools present in its [`ToolSpec`] can be called; the spec is
/// built from configuration with
/// [`tool_spec_from_entries`](super::tool_spec_from_entries).
pub struct LocalToolExecutor {
    /// Available tools
    tool_spec: ToolSpec,
    terminal: TerminalTool,
    safe_delete: Arc<SafeDelete>,
}

impl LocalToolExecutor {
    pub fn new(
        tool_spec: ToolSpec,
        runner: Arc<dyn CommandRunner>,
        confirmation: Arc<dyn ConfirmationPort>,
        trash: TrashConfig,
        command_timeout: Duration,
    ) -> Self {
        let safe_delete = Arc::new(SafeDelete::new(runner.clone(), trash, command_timeout));
        let terminal = TerminalTool::new(
            ConfirmationNegotiator::new(confirmation),
            runner,
            safe_delete.clone(),
            command_timeout,
        );
        Self {
            tool_spec,
            terminal,
            safe_delete,
        }
    }

    /// Check the call against the tool's definition.
    fn validate(&self, call: &ToolCall) -> Result<(), ToolError> {
        let definition = self
            .tool_spec
            .get(&call.tool_name)
            .ok_or_else(|| ToolError::not_found(format!("Unknown tool: {}", call.tool_name)))?;

        for param in definition.required_parameters() {
            if call.get(&param.name).is_none() {
                return Err(ToolError::invalid_argument(format!(
                    "Missing required argument: {}",
                    param.name
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        if let Err(e) = self.validate(call) {
            return ToolResult::failure(&call.tool_name, e);
        }

        match call.tool_name.as_str() {
            command::TERMINAL => self.terminal.execute(call).await,
            file::DELETE_FILES => file::execute_delete_files(call, &self.safe_delete).await,
            file::CREATE_FILE => file::execute_create_file(call),
            file::READ_FILE => file::execute_read_file(call),
            file::WRITE_FILE => file::execute_write_file(call),
            file::LIST_FILES => file::execute_list_files(call),
            web_search::WEB_SEARCH => web_search::execute_web_search(call),
            _ => ToolResult::failure(
                &call.tool_name,
                ToolError::execution_failed(format!(
                    "Tool '{}' is not implemented",
                    call.tool_name
                )),
            ),
        }
    }
}
