//! Prompt-based tool invocation grammar
//!
//! Models without native tool calling are asked to emit calls as
//! `TOOL_CALL: name(key="value", key2='value2')`. This module finds every
//! occurrence in a response, turns each into a [`ToolCall`], and returns the
//! remaining narrative text.
//!
//! Argument values are quoted strings only, matched non-greedily; numbers
//! and booleans are never coerced.

use super::entities::{ToolCall, ToolDefinition, ToolSpec};
use regex::Regex;
use std::sync::LazyLock;

/// Marker that introduces a call in model output
pub const TOOL_CALL_MARKER: &str = "TOOL_CALL:";

static CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"TOOL_CALL:\s*(\w+)\(((?:[^()"']|"[^"]*"|'[^']*')*)\)"#)
        .expect("tool call pattern is valid")
});

static ARG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("argument pattern is valid")
});

/// A model response split into narrative text and tool invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    /// Text left after removing every invocation
    pub narrative: String,
    /// Invocations in order of appearance
    pub invocations: Vec<ToolCall>,
}

impl ParsedResponse {
    pub fn has_invocations(&self) -> bool {
        !self.invocations.is_empty()
    }
}

/// Quick check used before parsing.
pub fn contains_tool_invocation(text: &str) -> bool {
    text.contains(TOOL_CALL_MARKER)
}

/// Parse all `TOOL_CALL:` occurrences out of `text`.
///
/// When nothing matches, the narrative is `text` unchanged.
pub fn parse_tool_invocations(text: &str) -> ParsedResponse {
    let invocations: Vec<ToolCall> = CALL_RE
        .captures_iter(text)
        .map(|caps| {
            let mut call = ToolCall::new(&caps[1]);
            for arg in ARG_RE.captures_iter(&caps[2]) {
                let value = arg
                    .get(2)
                    .or_else(|| arg.get(3))
                    .map(|m| m.as_str())
                    .unwrap_or_default();
                call = call.with_arg(&arg[1], value);
            }
            call
        })
        .collect();

    if invocations.is_empty() {
        return ParsedResponse {
            narrative: text.to_string(),
            invocations,
        };
    }

    let narrative = CALL_RE
        .replace_all(text, "")
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    ParsedResponse {
        narrative,
        invocations,
    }
}

/// Render the tool catalogue and call grammar appended to prompts for
/// models without native tool calling.
pub fn tool_catalogue_prompt(spec: &ToolSpec) -> String {
    let catalogue = spec
        .all()
        .map(describe_tool)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You have access to the following tools:
{catalogue}

To use a tool, write a line of the form:
TOOL_CALL: tool_name(param1="value1", param2="value2")

Quote every argument value. You may use several tools in one reply.
If no tool is needed, answer normally."#
    )
}

fn describe_tool(tool: &ToolDefinition) -> String {
    let mut line = format!("- {}: {}", tool.name, tool.description);
    if !tool.parameters.is_empty() {
        let params = tool
            .parameters
            .iter()
            .map(|p| {
                let required = if p.required { "required" } else { "optional" };
                format!("{} ({}): {}", p.name, required, p.description)
            })
            .collect::<Vec<_>>()
            .join("; ");
        line.push_str(&format!("\n  Parameters: {}", params));
    }
    line
}
