//! Memory entities: the bounded transcript and the persisted fact store

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while loading or saving long-term memory
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Malformed long-term memory in {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("Failed to read long-term memory from {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to save long-term memory to {path}: {reason}")]
    Write { path: String, reason: String },
}

/// Recent conversation transcript bounded by a character cap.
///
/// When an append pushes the transcript past the cap, characters are
/// dropped from the front so that exactly the last `cap` characters remain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortTermMemory {
    transcript: String,
    cap: usize,
}

impl ShortTermMemory {
    pub fn new(cap: usize) -> Self {
        Self {
            transcript: String::new(),
            cap,
        }
    }

    /// Record one exchange as `\nUser: <input>\nAgent: <response>`.
    pub fn record_exchange(&mut self, user_input: &str, response: &str) {
        self.transcript
            .push_str(&format!("\nUser: {}\nAgent: {}", user_input, response));
        self.enforce_cap();
    }

    fn enforce_cap(&mut self) {
        let len = self.transcript.chars().count();
        if len > self.cap {
            let skip = len - self.cap;
            let start = self
                .transcript
                .char_indices()
                .nth(skip)
                .map(|(i, _)| i)
                .unwrap_or(self.transcript.len());
            self.transcript.drain(..start);
        }
    }

    pub fn as_str(&self) -> &str {
        &self.transcript
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.transcript.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
    }
}

/// Persisted key/value facts, kept in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LongTermMemory {
    entries: BTreeMap<String, Value>,
}

impl LongTermMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the on-disk representation.
    ///
    /// Empty or whitespace-only content is an empty store. Anything that is
    /// not a JSON object is reported as malformed with the given `path`.
    pub fn from_json_str(content: &str, path: &str) -> Result<Self, MemoryError> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_str(content).map_err(|e| MemoryError::Malformed {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        match value {
            Value::Object(map) => Ok(Self {
                entries: map.into_iter().collect(),
            }),
            other => Err(MemoryError::Malformed {
                path: path.to_string(),
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Pretty-printed JSON object
    pub fn to_json_string(&self) -> String {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Compact JSON used inside the prompt context
    pub fn to_compact_json(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Snapshot of memory usage
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryStats {
    pub short_term_size: usize,
    pub short_term_cap: usize,
    pub usage_pct: f64,
    pub long_term_entries: usize,
    pub long_term_path: String,
    pub file_exists: bool,
}

impl MemoryStats {
    pub fn new(
        short_term: &ShortTermMemory,
        long_term: &LongTermMemory,
        long_term_path: impl Into<String>,
        file_exists: bool,
    ) -> Self {
        let usage_pct = if short_term.cap() == 0 {
            0.0
        } else {
            short_term.len() as f64 / short_term.cap() as f64 * 100.0
        };
        Self {
            short_term_size: short_term.len(),
            short_term_cap: short_term.cap(),
            usage_pct,
            long_term_entries: long_term.len(),
            long_term_path: long_term_path.into(),
            file_exists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_term_never_exceeds_cap() {
        let mut memory = ShortTermMemory::new(50);
        let mut full = String::new();
        for i in 0..20 {
            let input = format!("question {}", i);
            let response = format!("answer {}", i);
            memory.record_exchange(&input, &response);
            full.push_str(&format!("\nUser: {}\nAgent: {}", input, response));

            assert!(memory.len() <= 50);
            let expected: String = full
                .chars()
                .skip(full.chars().count().saturating_sub(50))
                .collect();
            assert_eq!(memory.as_str(), expected);
        }
    }

    #[test]
    fn test_short_term_cap_counts_characters() {
        let mut memory = ShortTermMemory::new(10);
        memory.record_exchange("日本語の質問", "はい");
        assert_eq!(memory.len(), 10);
        assert!(memory.as_str().ends_with("Agent: はい"));
    }

    #[test]
    fn test_long_term_empty_content() {
        assert!(LongTermMemory::from_json_str("", "m.json").unwrap().is_empty());
        assert!(LongTermMemory::from_json_str("  \n", "m.json").unwrap().is_empty());
    }

    #[test]
    fn test_long_term_malformed() {
        let err = LongTermMemory::from_json_str("{not json", "m.json").unwrap_err();
        assert!(matches!(err, MemoryError::Malformed { .. }));

        let err = LongTermMemory::from_json_str("[1, 2]", "m.json").unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_long_term_json_round_trip() {
        let mut memory = LongTermMemory::new();
        memory.insert("user_name", "Alice");
        memory.insert("visits", 3);

        let parsed = LongTermMemory::from_json_str(&memory.to_json_string(), "m.json").unwrap();
        assert_eq!(parsed, memory);
        assert_eq!(memory.to_compact_json(), r#"{"user_name":"Alice","visits":3}"#);
    }

    #[test]
    fn test_stats() {
        let mut short = ShortTermMemory::new(100);
        short.record_exchange("hi", "hello");
        let mut long = LongTermMemory::new();
        long.insert("user_name", "Bob");

        let stats = MemoryStats::new(&short, &long, "m.json", false);
        assert_eq!(stats.short_term_size, short.len());
        assert_eq!(stats.long_term_entries, 1);
        assert!((stats.usage_pct - short.len() as f64).abs() < 1e-9);
    }
}
