//! Long-term memory persistence port

use lmagent_domain::{LongTermMemory, MemoryError};

/// Whole-store persistence: every save rewrites the full store.
pub trait MemoryStore: Send + Sync {
    /// Where the store lives, for messages and stats
    fn location(&self) -> String;

    /// Whether anything has been persisted yet
    fn exists(&self) -> bool;

    /// Missing or empty storage is an empty store; malformed content is an error.
    fn load(&self) -> Result<LongTermMemory, MemoryError>;

    fn save(&self, memory: &LongTermMemory) -> Result<(), MemoryError>;

    /// Remove the persisted store entirely
    fn clear(&self) -> Result<(), MemoryError>;
}
