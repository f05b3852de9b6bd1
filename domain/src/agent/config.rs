//! Validated agent configuration
//!
//! [`AgentConfig`] is what the rest of the program runs on: it is built
//! once from the merged configuration sources, checked with
//! [`AgentConfig::validate`] and never changed for the session.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Names of the tools the executor knows how to run
pub const BUILTIN_TOOL_NAMES: &[&str] = &[
    "terminal",
    "create_file",
    "read_file",
    "write_file",
    "delete_files",
    "list_files",
    "web_search",
];

pub const DEFAULT_SHORT_TERM_CAP: usize = 10_240;
pub const DEFAULT_LONG_TERM_PATH: &str = "long_term_memory.json";
pub const DEFAULT_BASE_URL: &str = "http://localhost:1234";
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 3;
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI agent with access to tools for file operations, \
terminal commands, and web search. For safety, the user is asked to confirm \
potentially destructive commands, and safer alternatives are offered when \
available (like moving files to trash instead of permanent deletion). \
Use these tools to help users accomplish their tasks efficiently and safely.";

/// Configuration errors, all fatal at startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("memory_short_term_cap must be positive")]
    NonPositiveCap,

    #[error("memory_long_term_path cannot be empty")]
    EmptyLongTermPath,

    #[error("system_prompt cannot be empty")]
    EmptySystemPrompt,

    #[error("at least one tool must be configured")]
    NoTools,

    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("unknown tool: {0} (available: {available})", available = BUILTIN_TOOL_NAMES.join(", "))]
    UnknownTool(String),

    #[error("max_tool_rounds must be positive")]
    NonPositiveRounds,

    #[error("command_timeout_secs must be positive")]
    NonPositiveTimeout,

    #[error("invalid confirmation mode '{0}' (expected interactive, auto_approve or auto_reject)")]
    InvalidConfirmationMode(String),

    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// How destructive commands are confirmed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationMode {
    /// Ask on the console
    #[default]
    Interactive,
    /// Approve everything without asking
    AutoApprove,
    /// Decline everything without asking
    AutoReject,
}

impl ConfirmationMode {
    pub fn as_str(&self) -> &str {
        match self {
            ConfirmationMode::Interactive => "interactive",
            ConfirmationMode::AutoApprove => "auto_approve",
            ConfirmationMode::AutoReject => "auto_reject",
        }
    }
}

impl std::str::FromStr for ConfirmationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "interactive" => Ok(ConfirmationMode::Interactive),
            "auto_approve" => Ok(ConfirmationMode::AutoApprove),
            "auto_reject" => Ok(ConfirmationMode::AutoReject),
            _ => Err(ConfigError::InvalidConfirmationMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for ConfirmationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tool enabled for the session, with the description shown to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
}

impl ToolEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The seven builtin tools with their default descriptions
pub fn default_tools() -> Vec<ToolEntry> {
    vec![
        ToolEntry::new(
            "terminal",
            "Execute terminal/shell commands with smart confirmation for destructive operations",
        ),
        ToolEntry::new("create_file", "Create new files with content"),
        ToolEntry::new("read_file", "Read contents of existing files"),
        ToolEntry::new("write_file", "Write/overwrite file contents"),
        ToolEntry::new(
            "delete_files",
            "Safely delete files by moving to trash (not permanent deletion)",
        ),
        ToolEntry::new("list_files", "List files in directories with optional filtering"),
        ToolEntry::new("web_search", "Search the web for information"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Model key to use; `None` means ask the user
    pub model: Option<String>,
    /// LM Studio server base URL
    pub base_url: String,
    pub short_term_cap: usize,
    pub long_term_path: String,
    pub system_prompt: String,
    pub tools: Vec<ToolEntry>,
    pub confirmation_mode: ConfirmationMode,
    pub dev_mode: bool,
    /// Upper bound on native tool-calling rounds per turn
    pub max_tool_rounds: usize,
    pub command_timeout_secs: u64,
    /// JSONL conversation log; disabled when `None`
    pub conversation_log: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            short_term_cap: DEFAULT_SHORT_TERM_CAP,
            long_term_path: DEFAULT_LONG_TERM_PATH.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            tools: default_tools(),
            confirmation_mode: ConfirmationMode::default(),
            dev_mode: false,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            conversation_log: None,
        }
    }
}

impl AgentConfig {
    /// Check every invariant; the first violation is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.short_term_cap == 0 {
            return Err(ConfigError::NonPositiveCap);
        }
        if self.long_term_path.trim().is_empty() {
            return Err(ConfigError::EmptyLongTermPath);
        }
        if self.system_prompt.trim().is_empty() {
            return Err(ConfigError::EmptySystemPrompt);
        }
        if self.tools.is_empty() {
            return Err(ConfigError::NoTools);
        }
        let mut seen = HashSet::new();
        for tool in &self.tools {
            if !BUILTIN_TOOL_NAMES.contains(&tool.name.as_str()) {
                return Err(ConfigError::UnknownTool(tool.name.clone()));
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(ConfigError::DuplicateTool(tool.name.clone()));
            }
        }
        if self.max_tool_rounds == 0 {
            return Err(ConfigError::NonPositiveRounds);
        }
        if self.command_timeout_secs == 0 {
            return Err(ConfigError::NonPositiveTimeout);
        }
        Ok(())
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }
}
