//! LM Studio integration
//!
//! - [`LmStudioGateway`]: chat completions over HTTP, implements the
//!   [`LlmGateway`](lmagent_application::LlmGateway) port
//! - [`LmsCli`]: model listing and server management via `lms`

pub mod cli;
pub mod gateway;
pub mod protocol;

pub use cli::LmsCli;
pub use gateway::LmStudioGateway;
