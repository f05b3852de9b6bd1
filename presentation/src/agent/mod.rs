//! Agent presentation components
//!
//! - Interactive REPL for the agent shell
//! - Console confirmation of destructive commands
//! - Ctrl+C handling while a turn runs
//! - Startup model selection menu
//! - Spinner and tool lines while a turn runs

pub mod confirmation;
pub mod interrupt;
pub mod model_select;
pub mod progress;
pub mod repl;

pub use confirmation::{ConsoleConfirmation, PromptInput, TerminalInput};
pub use interrupt::Interrupt;
pub use model_select::{select_model, session_mode};
pub use progress::SpinnerProgress;
pub use repl::AgentRepl;
