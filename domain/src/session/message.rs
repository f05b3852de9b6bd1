//! Chat messages exchanged with the model runtime

use super::response::{
    ContentBlock, LlmResponse, TOOL_CALL_REQUEST_PREFIX, TOOL_CALL_RESULT_PREFIX,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// Message content is either a flat string or a list of blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }

    /// The assistant turn that produced `response`, tool requests included.
    pub fn from_response(response: &LlmResponse) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(response.content.clone()),
        }
    }

    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: MessageContent::Blocks(vec![ContentBlock::ToolResult {
                tool_use_id: tool_use_id.into(),
                content: content.into(),
            }]),
        }
    }

    /// Text fragments a user should see from this message.
    ///
    /// Flat content is taken as-is. Each block contributes its text, or its
    /// rendered form when it has none; fragments carrying tool-call metadata
    /// and empty fragments are dropped.
    pub fn visible_text(&self) -> Vec<String> {
        let fragments: Vec<String> = match &self.content {
            MessageContent::Text(text) => vec![text.clone()],
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .map(|b| match b.as_text() {
                    Some(text) => text.to_string(),
                    None => b.to_string(),
                })
                .collect(),
        };
        fragments
            .into_iter()
            .filter(|f| !is_metadata_fragment(f) && !f.trim().is_empty())
            .collect()
    }
}

fn is_metadata_fragment(fragment: &str) -> bool {
    let trimmed = fragment.trim_start();
    trimmed.starts_with(TOOL_CALL_REQUEST_PREFIX) || trimmed.starts_with(TOOL_CALL_RESULT_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_visible_text_flat() {
        let message = ChatMessage::assistant("Hello there");
        assert_eq!(message.visible_text(), vec!["Hello there".to_string()]);
    }

    #[test]
    fn test_visible_text_filters_metadata() {
        let response = LlmResponse {
            content: vec![
                ContentBlock::text("Checking the directory."),
                ContentBlock::ToolUse {
                    id: "1".to_string(),
                    name: "list_files".to_string(),
                    input: BTreeMap::new(),
                },
                ContentBlock::text("   "),
            ],
            stop_reason: None,
            model: None,
        };
        let message = ChatMessage::from_response(&response);
        assert_eq!(message.visible_text(), vec!["Checking the directory.".to_string()]);

        let result = ChatMessage::tool_result("1", "a.txt\nb.txt");
        assert!(result.visible_text().is_empty());
    }

    #[test]
    fn test_flat_text_with_metadata_prefix_is_dropped() {
        let message = ChatMessage::assistant("ToolCallResultData(tool_call_id=1)");
        assert!(message.visible_text().is_empty());
    }
}
