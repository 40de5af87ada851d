//! Image Cache
//!
//! Session-wide map from source URL to "preloaded". Append-only, no
//! eviction; the working set is one page's images.

use std::collections::HashMap;

/// Preload cache keyed by raw source URL
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<String, bool>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a URL as successfully preloaded
    pub fn insert(&mut self, src: &str) {
        self.entries.insert(src.to_string(), true);
    }

    /// Check whether a URL has been preloaded this session
    pub fn contains(&self, src: &str) -> bool {
        self.entries.get(src).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
