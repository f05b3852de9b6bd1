//! Agent configuration and model metadata.

pub mod config;
pub mod model;

pub use config::{AgentConfig, ConfigError, ConfirmationMode, ToolEntry, default_tools};
pub use model::{ModelRecord, ToolCallingMode, llm_models};
