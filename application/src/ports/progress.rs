//! Turn progress notification port
//!
//! Lets the presentation layer show activity (a spinner, tool banners)
//! while a turn runs. Every callback defaults to a no-op.

use lmagent_domain::{ToolCall, ToolResult};

pub trait TurnProgress: Send + Sync {
    /// A request is about to be sent to the model
    fn on_thinking(&self) {}

    /// The model answered (the spinner should stop before any prompt)
    fn on_model_response(&self) {}

    fn on_tool_start(&self, _call: &ToolCall) {}

    fn on_tool_complete(&self, _result: &ToolResult) {}

    /// The user interrupted the turn before it finished
    fn on_interrupted(&self) {}
}

/// No-op progress for tests and non-interactive use
pub struct NoTurnProgress;

impl TurnProgress for NoTurnProgress {}
