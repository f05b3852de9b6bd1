//! OpenAI-compatible chat completion wire types used by the LM Studio server
//!
//! Conversion goes one way for requests ([`ChatCompletionRequest::build`])
//! and the other for responses ([`ChatCompletionResponse::into_llm_response`]).
//! Tool arguments travel as a JSON-encoded object; non-string values are
//! stringified on the way in so every argument reaches the tools as text.

use lmagent_application::GatewayError;
use lmagent_domain::{
    ChatMessage, ContentBlock, LlmResponse, MessageContent, Role, StopReason, ToolDefinition,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<WireTool>>,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: WireFunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunctionCall {
    pub name: String,
    /// JSON-encoded argument object
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Serialize)]
pub struct WireTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: WireFunction,
}

#[derive(Debug, Serialize)]
pub struct WireFunction {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
pub struct WireChoice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Error body returned by the server on failure
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message { message: String },
    Text(String),
}

impl ErrorDetail {
    pub fn message(&self) -> &str {
        match self {
            ErrorDetail::Message { message } => message,
            ErrorDetail::Text(text) => text,
        }
    }
}

fn function_type() -> String {
    "function".to_string()
}

impl ChatCompletionRequest {
    pub fn build(model: &str, messages: &[ChatMessage], tools: &[ToolDefinition]) -> Self {
        let tools = if tools.is_empty() {
            None
        } else {
            Some(tools.iter().map(WireTool::from).collect())
        };
        Self {
            model: model.to_string(),
            messages: messages.iter().flat_map(wire_messages).collect(),
            tools,
            stream: false,
        }
    }
}

impl From<&ToolDefinition> for WireTool {
    fn from(def: &ToolDefinition) -> Self {
        let properties: Map<String, Value> = def
            .parameters
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    json!({ "type": "string", "description": p.description }),
                )
            })
            .collect();
        let required: Vec<&str> = def.required_parameters().map(|p| p.name.as_str()).collect();

        Self {
            tool_type: function_type(),
            function: WireFunction {
                name: def.name.clone(),
                description: def.description.clone(),
                parameters: json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }),
            },
        }
    }
}

/// One domain message can expand to several wire messages: every tool
/// result is its own `tool` message.
fn wire_messages(message: &ChatMessage) -> Vec<WireMessage> {
    let role = message.role.as_str().to_string();
    let blocks = match &message.content {
        MessageContent::Text(text) => {
            return vec![WireMessage {
                role,
                content: Some(text.clone()),
                tool_calls: None,
                tool_call_id: None,
            }];
        }
        MessageContent::Blocks(blocks) => blocks,
    };

    let mut texts = Vec::new();
    let mut calls = Vec::new();
    let mut results = Vec::new();
    for block in blocks {
        match block {
            ContentBlock::Text { text } => texts.push(text.as_str()),
            ContentBlock::ToolUse { id, name, input } => calls.push(WireToolCall {
                id: id.clone(),
                call_type: function_type(),
                function: WireFunctionCall {
                    name: name.clone(),
                    arguments: serde_json::to_string(input).unwrap_or_else(|_| "{}".to_string()),
                },
            }),
            ContentBlock::ToolResult {
                tool_use_id,
                content,
            } => results.push(WireMessage {
                role: Role::Tool.as_str().to_string(),
                content: Some(content.clone()),
                tool_calls: None,
                tool_call_id: Some(tool_use_id.clone()),
            }),
        }
    }

    let mut out = Vec::new();
    if !texts.is_empty() || !calls.is_empty() {
        out.push(WireMessage {
            role,
            content: (!texts.is_empty()).then(|| texts.join("\n")),
            tool_calls: (!calls.is_empty()).then_some(calls),
            tool_call_id: None,
        });
    }
    out.extend(results);
    out
}

impl ChatCompletionResponse {
    pub fn into_llm_response(self) -> Result<LlmResponse, GatewayError> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::InvalidResponse("No choices in response".to_string()))?;

        let mut content = Vec::new();
        if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
            content.push(ContentBlock::text(text));
        }
        for call in choice.message.tool_calls.unwrap_or_default() {
            content.push(ContentBlock::ToolUse {
                input: parse_arguments(&call.function.name, &call.function.arguments),
                id: call.id,
                name: call.function.name,
            });
        }

        Ok(LlmResponse {
            content,
            stop_reason: choice
                .finish_reason
                .as_deref()
                .map(StopReason::from_finish_reason),
            model: self.model,
        })
    }
}

/// Decode a tool call's argument object into string values.
///
/// Strings are kept as-is, other JSON values use their JSON text, `null` is
/// dropped. Unparseable arguments yield an empty map.
pub fn parse_arguments(tool: &str, raw: &str) -> BTreeMap<String, String> {
    if raw.trim().is_empty() {
        return BTreeMap::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::Null => None,
                Value::String(s) => Some((k, s)),
                other => Some((k, other.to_string())),
            })
            .collect(),
        Ok(other) => {
            warn!(tool = %tool, arguments = %other, "Tool arguments are not an object");
            BTreeMap::new()
        }
        Err(e) => {
            warn!(tool = %tool, error = %e, "Could not parse tool arguments");
            BTreeMap::new()
        }
    }
}
