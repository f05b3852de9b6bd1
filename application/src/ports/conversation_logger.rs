//! Port for structured conversation logging.
//!
//! Separate from `tracing`: tracing carries diagnostics for the operator,
//! this port records the conversation itself (user input, responses, tool
//! calls) in a machine-readable form such as JSONL.

use serde_json::Value;

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "user_input", "tool_call").
    pub event_type: &'static str,
    /// Event-specific fields.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Records conversation events.
///
/// `log` is synchronous and infallible; failures are the implementation's
/// problem and must not interrupt the turn.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Used when no conversation log is configured.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
