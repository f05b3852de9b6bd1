//! `!`-prefixed commands understood in development mode

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevCommand {
    Tokens,
    Memory,
    Stats,
    Clear,
    /// Drop every long-term fact
    Forget,
    Help,
    Unknown(String),
}

impl DevCommand {
    /// Parse a line of user input. Returns `None` for input that is not a
    /// dev command at all (no leading `!`).
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        let name = trimmed.strip_prefix('!')?;
        Some(match name.to_lowercase().as_str() {
            "tokens" => DevCommand::Tokens,
            "memory" => DevCommand::Memory,
            "stats" => DevCommand::Stats,
            "clear" => DevCommand::Clear,
            "forget" => DevCommand::Forget,
            "help" => DevCommand::Help,
            _ => DevCommand::Unknown(trimmed.to_string()),
        })
    }

    /// `(command, description)` pairs for the help listing
    pub fn help_entries() -> &'static [(&'static str, &'static str)] {
        &[
            ("!tokens", "Token usage and context growth"),
            ("!memory", "Short-term and long-term memory usage"),
            ("!stats", "Session and tool call statistics"),
            ("!clear", "Clear short-term memory"),
            ("!forget", "Forget long-term facts and delete the memory file"),
            ("!help", "Show this help"),
        ]
    }
}
