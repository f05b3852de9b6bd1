//! Long-term memory persistence

mod json_store;

pub use json_store::JsonFileMemoryStore;
