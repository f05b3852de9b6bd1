//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod command_runner;
pub mod confirmation;
pub mod conversation_logger;
pub mod llm_gateway;
pub mod memory_store;
pub mod progress;
pub mod tool_executor;
