//! Key-Value Store
//!
//! Session-scoped persistent storage analogue. Holds the one persisted
//! pair the page uses (`darkMode`).

use std::collections::HashMap;

/// String key-value store
#[derive(Debug, Default)]
pub struct LocalStore {
    entries: HashMap<String, String>,
}

impl LocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a stored value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.as_str())
    }

    /// Store a value, replacing any existing one
    pub fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Remove a value
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
