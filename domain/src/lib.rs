//! Domain layer for lmagent
//!
//! This crate contains the core rules of the agent shell. It has no
//! dependencies on infrastructure or presentation concerns and performs no
//! I/O.
//!
//! # Core Concepts
//!
//! - **Tools** ([`tool`]): definitions, calls and results, plus the
//!   `TOOL_CALL:` grammar used by models without native tool calling
//! - **Command safety** ([`safety`]): risk tiers for shell commands and the
//!   states of the confirmation negotiation
//! - **Memory** ([`memory`]): a capped recent transcript and persisted facts
//! - **Sessions** ([`session`]): chat messages and structured responses
//! - **Dev mode** ([`dev`]): token and tool-call observability

pub mod agent;
pub mod dev;
pub mod memory;
pub mod safety;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use agent::{
    AgentConfig, ConfigError, ConfirmationMode, ModelRecord, ToolCallingMode, ToolEntry,
};
pub use dev::{DevCommand, SessionTracker};
pub use memory::{LongTermMemory, MemoryError, MemoryStats, ShortTermMemory};
pub use safety::{
    AlternativeChoice, CommandBreakdown, ConfirmationReply, ConfirmationRequest, FindDeletePlan,
    NegotiationState, Resolution, RiskTier,
};
pub use session::{ChatMessage, ContentBlock, LlmResponse, MessageContent, Role, StopReason};
pub use tool::{ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult, ToolSpec};
