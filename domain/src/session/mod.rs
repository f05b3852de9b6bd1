//! Model session types: chat messages and structured responses.

pub mod message;
pub mod response;

pub use message::{ChatMessage, MessageContent, Role};
pub use response::{ContentBlock, LlmResponse, StopReason};
