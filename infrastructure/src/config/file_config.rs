//! Raw configuration data types
//!
//! [`FileConfig`] mirrors the keys accepted in config files and
//! `LMAGENT_*` environment variables. Numbers are kept signed so that a
//! negative value reaches validation and gets a proper message instead of
//! a deserialization error.

use lmagent_domain::agent::config::{
    DEFAULT_BASE_URL, DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_LONG_TERM_PATH,
    DEFAULT_MAX_TOOL_ROUNDS, DEFAULT_SHORT_TERM_CAP, DEFAULT_SYSTEM_PROMPT,
};
use lmagent_domain::{AgentConfig, ConfigError, ConfirmationMode, ToolEntry, agent::default_tools};
use serde::{Deserialize, Serialize};

/// A tool entry as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileToolEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model key; when unset the user picks one at startup
    pub lm_studio_model: Option<String>,
    pub base_url: String,
    pub memory_short_term_cap: i64,
    pub memory_long_term_path: String,
    pub system_prompt: String,
    pub tools: Vec<FileToolEntry>,
    /// `interactive`, `auto_approve` or `auto_reject`
    pub confirmation_mode: String,
    pub dev_mode: bool,
    pub max_tool_rounds: i64,
    pub command_timeout_secs: i64,
    /// Path of the JSONL conversation log
    pub conversation_log: Option<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            lm_studio_model: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            memory_short_term_cap: DEFAULT_SHORT_TERM_CAP as i64,
            memory_long_term_path: DEFAULT_LONG_TERM_PATH.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            tools: default_tools()
                .into_iter()
                .map(|t| FileToolEntry {
                    name: t.name,
                    description: t.description,
                })
                .collect(),
            confirmation_mode: ConfirmationMode::default().to_string(),
            dev_mode: false,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS as i64,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS as i64,
            conversation_log: None,
        }
    }
}

impl FileConfig {
    /// Render as TOML, in the shape accepted by `lmagent.toml`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Convert to the validated runtime configuration.
    pub fn into_agent_config(self) -> Result<AgentConfig, ConfigError> {
        let short_term_cap = positive(self.memory_short_term_cap, ConfigError::NonPositiveCap)?;
        let max_tool_rounds = positive(self.max_tool_rounds, ConfigError::NonPositiveRounds)?;
        let command_timeout_secs =
            positive(self.command_timeout_secs, ConfigError::NonPositiveTimeout)? as u64;
        let confirmation_mode = self.confirmation_mode.parse::<ConfirmationMode>()?;

        let config = AgentConfig {
            model: self.lm_studio_model.filter(|m| !m.trim().is_empty()),
            base_url: self.base_url,
            short_term_cap,
            long_term_path: self.memory_long_term_path,
            system_prompt: self.system_prompt,
            tools: self
                .tools
                .into_iter()
                .map(|t| ToolEntry::new(t.name, t.description))
                .collect(),
            confirmation_mode,
            dev_mode: self.dev_mode,
            max_tool_rounds,
            command_timeout_secs,
            conversation_log: self.conversation_log.filter(|p| !p.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }
}

fn positive(value: i64, err: ConfigError) -> Result<usize, ConfigError> {
    if value <= 0 {
        Err(err)
    } else {
        usize::try_from(value).map_err(|_| err)
    }
}
