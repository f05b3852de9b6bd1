//! Memory manager: merges short-term and long-term memory into prompt
//! context and keeps the persisted store in sync.

use crate::ports::memory_store::MemoryStore;
use lmagent_domain::memory::{
    LongTermMemory, MemoryError, MemoryStats, ShortTermMemory, USER_NAME_KEY, extract_user_name,
    render_memory_context,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct MemoryManager {
    short_term: ShortTermMemory,
    long_term: LongTermMemory,
    store: Arc<dyn MemoryStore>,
}

impl MemoryManager {
    /// Load long-term memory from `store`.
    ///
    /// Malformed persisted content is fatal and returned as-is.
    pub fn load(short_term_cap: usize, store: Arc<dyn MemoryStore>) -> Result<Self, MemoryError> {
        let long_term = store.load()?;
        info!(
            location = %store.location(),
            entries = long_term.len(),
            "Loaded long-term memory"
        );
        Ok(Self {
            short_term: ShortTermMemory::new(short_term_cap),
            long_term,
            store,
        })
    }

    /// Context block for the next prompt; empty when there is nothing to add.
    pub fn context(&self) -> String {
        render_memory_context(&self.short_term, &self.long_term)
    }

    /// Record a finished exchange, then look for facts worth keeping.
    pub fn update(&mut self, user_input: &str, response: &str) -> Result<(), MemoryError> {
        self.short_term.record_exchange(user_input, response);
        debug!(
            size = self.short_term.len(),
            cap = self.short_term.cap(),
            "Short-term memory updated"
        );
        self.extract(user_input)
    }

    /// Store facts found in `user_input` and flush the whole store.
    pub fn extract(&mut self, user_input: &str) -> Result<(), MemoryError> {
        if let Some(name) = extract_user_name(user_input) {
            info!(name = %name, "Remembering user name");
            self.long_term.insert(USER_NAME_KEY, name);
            self.store.save(&self.long_term)?;
        }
        Ok(())
    }

    pub fn stats(&self) -> MemoryStats {
        MemoryStats::new(
            &self.short_term,
            &self.long_term,
            self.store.location(),
            self.store.exists(),
        )
    }

    pub fn clear_short_term(&mut self) {
        self.short_term.clear();
        info!("Short-term memory cleared");
    }

    /// Forget every stored fact and delete the persisted file.
    pub fn clear_long_term(&mut self) -> Result<(), MemoryError> {
        self.long_term.clear();
        self.store.clear()?;
        info!("Long-term memory cleared");
        Ok(())
    }

    pub fn short_term(&self) -> &ShortTermMemory {
        &self.short_term
    }

    pub fn long_term(&self) -> &LongTermMemory {
        &self.long_term
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory store shared between managers to simulate a restart.
    #[derive(Default)]
    pub(crate) struct InMemoryStore {
        pub(crate) content: Mutex<Option<String>>,
        pub(crate) saves: Mutex<usize>,
    }

    impl MemoryStore for InMemoryStore {
        fn location(&self) -> String {
            "memory://test".to_string()
        }

        fn exists(&self) -> bool {
            self.content.lock().unwrap().is_some()
        }

        fn load(&self) -> Result<LongTermMemory, MemoryError> {
            match self.content.lock().unwrap().as_deref() {
                Some(content) => LongTermMemory::from_json_str(content, "memory://test"),
                None => Ok(LongTermMemory::new()),
            }
        }

        fn save(&self, memory: &LongTermMemory) -> Result<(), MemoryError> {
            *self.content.lock().unwrap() = Some(memory.to_json_string());
            *self.saves.lock().unwrap() += 1;
            Ok(())
        }

        fn clear(&self) -> Result<(), MemoryError> {
            *self.content.lock().unwrap() = None;
            Ok(())
        }
    }

    #[test]
    fn test_context_sections() {
        let store = Arc::new(InMemoryStore::default());
        let mut manager = MemoryManager::load(1000, store).unwrap();
        assert_eq!(manager.context(), "");

        manager.update("hello", "hi there").unwrap();
        assert!(manager.context().starts_with("Recent conversation: "));
        assert!(!manager.context().contains("Important information"));

        manager.update("my name is alice", "Nice to meet you").unwrap();
        assert!(manager.context().contains(r#"Important information: {"user_name":"Alice"}"#));
    }

    #[test]
    fn test_long_term_survives_reload() {
        let store = Arc::new(InMemoryStore::default());
        let mut first = MemoryManager::load(1000, store.clone()).unwrap();
        first.update("My name is bob", "Hello Bob").unwrap();

        let second = MemoryManager::load(1000, store).unwrap();
        assert_eq!(second.long_term(), first.long_term());
        assert_eq!(
            second.long_term().get(USER_NAME_KEY).and_then(|v| v.as_str()),
            Some("Bob")
        );
        // short-term memory is per-session
        assert!(second.short_term().is_empty());
    }

    #[test]
    fn test_update_without_fact_does_not_save() {
        let store = Arc::new(InMemoryStore::default());
        let mut manager = MemoryManager::load(1000, store.clone()).unwrap();
        manager.update("what time is it", "noon").unwrap();
        assert_eq!(*store.saves.lock().unwrap(), 0);
    }

    #[test]
    fn test_malformed_store_is_fatal() {
        let store = Arc::new(InMemoryStore::default());
        *store.content.lock().unwrap() = Some("{oops".to_string());
        assert!(matches!(
            MemoryManager::load(1000, store),
            Err(MemoryError::Malformed { .. })
        ));
    }

    #[test]
    fn test_clear() {
        let store = Arc::new(InMemoryStore::default());
        let mut manager = MemoryManager::load(1000, store.clone()).unwrap();
        manager.update("my name is carol", "Hi").unwrap();
        assert!(manager.stats().file_exists);

        manager.clear_short_term();
        assert_eq!(manager.stats().short_term_size, 0);

        manager.clear_long_term().unwrap();
        assert!(manager.long_term().is_empty());
        assert!(!manager.stats().file_exists);
    }
}
