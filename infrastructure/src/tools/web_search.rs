//! Web search tool (placeholder)
//!
//! Registered so models can discover it; it reports that search is not
//! available and echoes the query.

use lmagent_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};

pub const WEB_SEARCH: &str = "web_search";

pub fn web_search_definition() -> ToolDefinition {
    ToolDefinition::new(WEB_SEARCH, "Search the web for information")
        .with_parameter(ToolParameter::new("query", "Search query", true))
}

pub fn execute_web_search(call: &ToolCall) -> ToolResult {
    let query = match call.require("query") {
        Ok(q) => q,
        Err(e) => return ToolResult::failure(WEB_SEARCH, ToolError::invalid_argument(e)),
    };

    ToolResult::success(
        WEB_SEARCH,
        format!(
            "Web search functionality not yet implemented. Your query was: '{}'",
            query
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_search_echoes_query() {
        let call = ToolCall::new(WEB_SEARCH).with_arg("query", "rust async");
        let result = execute_web_search(&call);

        assert!(result.is_success());
        assert_eq!(
            result.output(),
            Some("Web search functionality not yet implemented. Your query was: 'rust async'")
        );
    }

    #[test]
    fn test_web_search_requires_query() {
        let result = execute_web_search(&ToolCall::new(WEB_SEARCH));
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }
}
