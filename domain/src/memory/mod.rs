//! Conversation memory
//!
//! Two tiers feed the prompt context:
//!
//! - [`ShortTermMemory`]: the recent transcript, capped in characters
//! - [`LongTermMemory`]: facts persisted as a JSON object between sessions
//!
//! Persistence itself is an application port; this module holds only the
//! values and the pure rules (capping, fact extraction, context rendering).

pub mod entities;
pub mod extraction;

pub use entities::{LongTermMemory, MemoryError, MemoryStats, ShortTermMemory};
pub use extraction::{USER_NAME_KEY, extract_user_name, render_memory_context};
