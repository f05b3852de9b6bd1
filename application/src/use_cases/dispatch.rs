//! Shared tool dispatch: resolve → execute → format.
//!
//! Both tool-calling paths (native and prompt-based) go through
//! [`ToolDispatcher::invoke`], so unknown tools, logging and progress
//! callbacks behave the same way regardless of how the call was obtained.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::progress::TurnProgress;
use crate::ports::tool_executor::ToolExecutorPort;
use lmagent_domain::util::preview;
use lmagent_domain::{ToolCall, ToolError, ToolResult, ToolSpec};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

const LOG_PREVIEW_CHARS: usize = 500;

pub struct ToolDispatcher {
    executor: Arc<dyn ToolExecutorPort>,
    logger: Arc<dyn ConversationLogger>,
}

impl ToolDispatcher {
    pub fn new(executor: Arc<dyn ToolExecutorPort>, logger: Arc<dyn ConversationLogger>) -> Self {
        Self { executor, logger }
    }

    pub fn tool_spec(&self) -> &ToolSpec {
        self.executor.tool_spec()
    }

    /// Run one call. Unknown tool names produce a `NOT_FOUND` failure
    /// without touching the executor.
    pub async fn invoke(&self, call: &ToolCall, progress: &dyn TurnProgress) -> ToolResult {
        if !self.executor.has_tool(&call.tool_name) {
            warn!(tool = %call.tool_name, "Model requested an unknown tool");
            let result = ToolResult::failure(
                &call.tool_name,
                ToolError::new("NOT_FOUND", format!("Unknown tool: {}", call.tool_name)),
            );
            self.log(call, &result);
            return result;
        }

        progress.on_tool_start(call);
        let start = Instant::now();
        let result = self.executor.execute(call).await;
        debug!(
            tool = %call.tool_name,
            success = result.is_success(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Tool finished"
        );
        progress.on_tool_complete(&result);
        self.log(call, &result);
        result
    }

    fn log(&self, call: &ToolCall, result: &ToolResult) {
        self.logger.log(ConversationEvent::new(
            "tool_call",
            json!({
                "tool": call.tool_name,
                "arguments": call.arguments,
                "success": result.is_success(),
                "output": preview(&result.display_text(), LOG_PREVIEW_CHARS),
            }),
        ));
    }

    /// Text folded into a prompt-based response for one call.
    pub fn fragment(call: &ToolCall, result: &ToolResult) -> String {
        format!("[{}] {}", call.tool_name, result.display_text())
    }
}
