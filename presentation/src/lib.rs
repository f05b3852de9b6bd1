//! Presentation layer for lmagent
//!
//! This crate contains the CLI definition, the agent REPL, the console
//! confirmation adapter, model selection and output formatting.

pub mod agent;
pub mod cli;
pub mod output;

// Re-export commonly used types
pub use agent::{
    AgentRepl, ConsoleConfirmation, Interrupt, SpinnerProgress, select_model, session_mode,
};
pub use cli::commands::{Cli, ConfirmationModeArg};
pub use output::console::{ConsoleFormatter, SessionInfo};
