//! Structured model responses for native tool calling.
//!
//! ```text
//! PromptBased:  chat() → text → parse_tool_invocations()
//! Native:       chat(tools) → LlmResponse → tool_calls()
//! ```

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix of the rendered form of a tool call request
pub const TOOL_CALL_REQUEST_PREFIX: &str = "ToolCallRequestData";
/// Prefix of the rendered form of a tool call result
pub const TOOL_CALL_RESULT_PREFIX: &str = "ToolCallResultData";

/// A single block of message content.
///
/// Tool blocks have no text of their own; their [`Display`](std::fmt::Display)
/// form starts with a metadata prefix so transcript extraction can drop them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: BTreeMap<String, String>,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Convert a `ToolUse` block into a [`ToolCall`].
    pub fn to_tool_call(&self) -> Option<ToolCall> {
        match self {
            ContentBlock::ToolUse { id, name, input } => {
                let mut call = ToolCall::new(name).with_id(id);
                call.arguments = input.clone();
                Some(call)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentBlock::Text { text } => write!(f, "{}", text),
            ContentBlock::ToolUse { id, name, input } => write!(
                f,
                "{}(id={}, name={}, arguments={:?})",
                TOOL_CALL_REQUEST_PREFIX, id, name, input
            ),
            ContentBlock::ToolResult {
                tool_use_id,
                content,
            } => write!(
                f,
                "{}(tool_call_id={}, content={:?})",
                TOOL_CALL_RESULT_PREFIX, tool_use_id, content
            ),
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of response
    EndTurn,
    /// The model wants tools executed
    ToolUse,
    /// Hit the token limit
    MaxTokens,
    /// Runtime-specific stop reason
    Other(String),
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`.
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" => StopReason::EndTurn,
            "tool_calls" | "function_call" => StopReason::ToolUse,
            "length" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// A structured response from the model
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    pub model: Option<String>,
}

impl LlmResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// All text blocks joined with newlines
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(ContentBlock::to_tool_call)
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool_use() -> ContentBlock {
        ContentBlock::ToolUse {
            id: "call_1".to_string(),
            name: "read_file".to_string(),
            input: [("path".to_string(), "/README.md".to_string())]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn test_from_text() {
        let response = LlmResponse::from_text("Hello!");
        assert_eq!(response.text_content(), "Hello!");
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn test_tool_calls() {
        let response = LlmResponse {
            content: vec![ContentBlock::text("Reading file..."), tool_use()],
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        };

        assert!(response.has_tool_calls());
        let calls = response.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].get("path"), Some("/README.md"));
        assert_eq!(calls[0].id.as_deref(), Some("call_1"));
        assert_eq!(response.text_content(), "Reading file...");
    }

    #[test]
    fn test_display_prefixes() {
        assert!(tool_use().to_string().starts_with(TOOL_CALL_REQUEST_PREFIX));
        let result = ContentBlock::ToolResult {
            tool_use_id: "call_1".to_string(),
            content: "ok".to_string(),
        };
        assert!(result.to_string().starts_with(TOOL_CALL_RESULT_PREFIX));
        assert_eq!(ContentBlock::text("plain").to_string(), "plain");
    }

    #[test]
    fn test_stop_reason_mapping() {
        assert_eq!(StopReason::from_finish_reason("stop"), StopReason::EndTurn);
        assert_eq!(StopReason::from_finish_reason("tool_calls"), StopReason::ToolUse);
        assert_eq!(StopReason::from_finish_reason("length"), StopReason::MaxTokens);
        assert_eq!(
            StopReason::from_finish_reason("content_filter"),
            StopReason::Other("content_filter".to_string())
        );
    }
}
