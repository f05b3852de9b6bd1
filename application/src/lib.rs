//! Application layer for lmagent
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    command_runner::{CommandError, CommandOutput, CommandRunner},
    confirmation::{
        AutoApproveConfirmation, AutoRejectConfirmation, ConfirmationError, ConfirmationPort,
    },
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway},
    memory_store::MemoryStore,
    progress::{NoTurnProgress, TurnProgress},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::dispatch::ToolDispatcher;
pub use use_cases::memory::MemoryManager;
pub use use_cases::negotiate_command::{ConfirmationNegotiator, NegotiationError};
pub use use_cases::run_turn::{DevReport, RunTurnError, RunTurnUseCase, TurnOutcome};
