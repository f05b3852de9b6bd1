//! Tool Executor port
//!
//! Defines the interface for executing tools (shell commands, file
//! operations, trash-based deletion).

use async_trait::async_trait;
use lmagent_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Execute a tool call.
    ///
    /// A destructive command the user declines comes back as a failed
    /// result with a `CANCELLED` error.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
