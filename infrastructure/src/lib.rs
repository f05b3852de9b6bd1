//! Infrastructure layer for lmagent
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the LM Studio gateway, the local tool executor and
//! shell runner, JSON memory persistence, conversation logging and
//! configuration file loading.

pub mod config;
pub mod lmstudio;
pub mod logging;
pub mod memory;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileToolEntry};
pub use lmstudio::{LmStudioGateway, LmsCli};
pub use logging::JsonlConversationLogger;
pub use memory::JsonFileMemoryStore;
pub use tools::{
    LocalToolExecutor, SafeDelete, SystemShell, TrashConfig, default_tool_spec,
    tool_spec_from_entries,
};
