//! Fact extraction and prompt context rendering

use super::entities::{LongTermMemory, ShortTermMemory};
use regex::Regex;
use std::sync::LazyLock;

/// Long-term memory key for the user's name
pub const USER_NAME_KEY: &str = "user_name";

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"my name is (\w+)").expect("name pattern is valid"));

/// Find a self-introduction (`my name is X`) and return `X` title-cased.
///
/// Only the first word is taken, so "my name is Mary Ann" yields "Mary".
pub fn extract_user_name(user_input: &str) -> Option<String> {
    let lowered = user_input.to_lowercase();
    NAME_RE
        .captures(&lowered)
        .map(|caps| title_case(&caps[1]))
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build the context block appended to the user's prompt.
///
/// Each section is present only when non-empty; with both empty the result
/// is an empty string.
pub fn render_memory_context(short_term: &ShortTermMemory, long_term: &LongTermMemory) -> String {
    let mut parts = Vec::new();
    if !short_term.is_empty() {
        parts.push(format!("Recent conversation: {}", short_term.as_str()));
    }
    if !long_term.is_empty() {
        parts.push(format!("Important information: {}", long_term.to_compact_json()));
    }
    parts.join("\n")
}
