//! Tool domain module
//!
//! Tools give the model concrete capabilities: shell commands, file I/O,
//! trash-based deletion. Every tool is described by a [`ToolDefinition`],
//! invoked through a [`ToolCall`] and answers with a [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (registry)   │    │ (invocation) │    │ (output)     │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! Calls reach the executor by one of two paths:
//!
//! - **Native**: the model runtime returns structured tool calls.
//! - **Prompt-based**: the model writes `TOOL_CALL: name(key="value")` lines,
//!   parsed by [`invocation::parse_tool_invocations`].

pub mod entities;
pub mod invocation;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use invocation::{
    ParsedResponse, contains_tool_invocation, parse_tool_invocations, tool_catalogue_prompt,
};
pub use value_objects::{ToolError, ToolResult, ToolResultMetadata};
