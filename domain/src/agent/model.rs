//! Model metadata reported by the local runtime

use serde::{Deserialize, Serialize};

/// One entry of the runtime's model listing (`lms ls --json`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub model_key: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// "llm" or "embedding"
    #[serde(rename = "type", default)]
    pub model_type: String,
    #[serde(default)]
    pub trained_for_tool_use: Option<bool>,
}

impl ModelRecord {
    pub fn is_llm(&self) -> bool {
        self.model_type == "llm"
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.model_key)
    }

    pub fn calling_mode(&self) -> ToolCallingMode {
        if self.trained_for_tool_use.unwrap_or(false) {
            ToolCallingMode::Native
        } else {
            ToolCallingMode::PromptBased
        }
    }
}

/// How tool calls are obtained from the model for this session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToolCallingMode {
    /// The runtime returns structured tool calls
    Native,
    /// The model writes `TOOL_CALL:` lines that are parsed from its text
    #[default]
    PromptBased,
}

impl ToolCallingMode {
    pub fn as_str(&self) -> &str {
        match self {
            ToolCallingMode::Native => "native",
            ToolCallingMode::PromptBased => "prompt-based",
        }
    }
}

/// Keep only chat models, in listing order.
pub fn llm_models(records: Vec<ModelRecord>) -> Vec<ModelRecord> {
    records.into_iter().filter(ModelRecord::is_llm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_listing() {
        let json = r#"[
            {"modelKey": "qwen2.5-7b-instruct", "displayName": "Qwen2.5 7B", "type": "llm", "trainedForToolUse": true},
            {"modelKey": "nomic-embed", "type": "embedding"},
            {"modelKey": "phi-3", "type": "llm"}
        ]"#;
        let records: Vec<ModelRecord> = serde_json::from_str(json).unwrap();
        let llms = llm_models(records);

        assert_eq!(llms.len(), 2);
        assert_eq!(llms[0].label(), "Qwen2.5 7B");
        assert_eq!(llms[0].calling_mode(), ToolCallingMode::Native);
        assert_eq!(llms[1].label(), "phi-3");
        assert_eq!(llms[1].calling_mode(), ToolCallingMode::PromptBased);
    }
}
