//! JSON file adapter for the [`MemoryStore`] port

use lmagent_application::MemoryStore;
use lmagent_domain::{LongTermMemory, MemoryError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Long-term memory kept as one pretty-printed JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileMemoryStore {
    path: PathBuf,
}

impl JsonFileMemoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

impl MemoryStore for JsonFileMemoryStore {
    fn location(&self) -> String {
        self.display()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn load(&self) -> Result<LongTermMemory, MemoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.display(), "No long-term memory file yet");
                return Ok(LongTermMemory::new());
            }
            Err(e) => {
                return Err(MemoryError::Read {
                    path: self.display(),
                    reason: e.to_string(),
                });
            }
        };
        LongTermMemory::from_json_str(&content, &self.display())
    }

    fn save(&self, memory: &LongTermMemory) -> Result<(), MemoryError> {
        let write_err = |e: std::io::Error| MemoryError::Write {
            path: self.display(),
            reason: e.to_string(),
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&self.path, memory.to_json_string()).map_err(write_err)?;
        debug!(path = %self.display(), entries = memory.len(), "Saved long-term memory");
        Ok(())
    }

    fn clear(&self) -> Result<(), MemoryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MemoryError::Write {
                path: self.display(),
                reason: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lmagent_application::MemoryManager;
    use std::sync::Arc;

    #[test]
    fn test_missing_and_empty_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileMemoryStore::new(dir.path().join("memory.json"));

        assert!(!store.exists());
        assert!(store.load().unwrap().is_empty());

        fs::write(store.path(), "").unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileMemoryStore::new(dir.path().join("memory.json"));

        fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.load(), Err(MemoryError::Malformed { .. })));

        fs::write(store.path(), "[1, 2, 3]").unwrap();
        assert!(matches!(store.load(), Err(MemoryError::Malformed { .. })));
    }

    #[test]
    fn test_save_creates_parents_and_pretty_prints() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileMemoryStore::new(dir.path().join("state").join("memory.json"));

        let mut memory = LongTermMemory::new();
        memory.insert("user_name", "Ada");
        store.save(&memory).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("\n"));
        assert!(content.contains("\"user_name\": \"Ada\""));
        assert_eq!(store.load().unwrap(), memory);
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileMemoryStore::new(dir.path().join("memory.json"));
        store.save(&LongTermMemory::new()).unwrap();
        assert!(store.exists());

        store.clear().unwrap();
        assert!(!store.exists());
        store.clear().unwrap();
    }

    #[test]
    fn test_long_term_memory_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long_term_memory.json");

        let mut first =
            MemoryManager::load(1024, Arc::new(JsonFileMemoryStore::new(&path))).unwrap();
        first.update("Hi, my name is grace", "Nice to meet you").unwrap();
        let saved = first.long_term().clone();
        drop(first);

        let second =
            MemoryManager::load(1024, Arc::new(JsonFileMemoryStore::new(&path))).unwrap();
        assert_eq!(second.long_term(), &saved);
        assert_eq!(
            second.long_term().get("user_name"),
            Some(&serde_json::json!("Grace"))
        );
        assert!(second.short_term().is_empty());
    }
}
