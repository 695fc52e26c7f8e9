//! Modification-time keyed cache shared by tag extraction and encoding
//! detection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone)]
struct Entry<V> {
    modified: SystemTime,
    value: V,
}

/// Values derived from a file, trusted only while the file's modification
/// time is unchanged.
#[derive(Debug, Clone)]
pub struct MtimeCache<V> {
    entries: HashMap<PathBuf, Entry<V>>,
}

impl<V> Default for MtimeCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> MtimeCache<V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value when it was stored for `modified`.
    #[must_use]
    pub fn get(&self, path: &Path, modified: SystemTime) -> Option<&V> {
        self.entries
            .get(path)
            .filter(|entry| entry.modified == modified)
            .map(|entry| &entry.value)
    }

    /// Stores `value` for `path` as observed at `modified`.
    pub fn put(&mut self, path: PathBuf, modified: SystemTime, value: V) {
        self.entries.insert(path, Entry { modified, value });
    }

    /// Drops the entry for `path`, returning its value.
    pub fn invalidate(&mut self, path: &Path) -> Option<V> {
        self.entries.remove(path).map(|entry| entry.value)
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries, stale or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
