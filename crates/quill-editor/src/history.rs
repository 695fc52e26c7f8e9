//! Per-file undo stacks.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Content of a file before a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// The file did not exist; undoing removes it.
    Absent,
    /// The exact bytes on disk.
    Bytes(Vec<u8>),
}

/// Unbounded stacks of prior file contents, most recent last.
#[derive(Debug, Default)]
pub struct EditHistory {
    stacks: HashMap<PathBuf, Vec<Snapshot>>,
}

impl EditHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the state of `path` before a successful mutation.
    pub fn push(&mut self, path: &Path, snapshot: Snapshot) {
        self.stacks
            .entry(path.to_path_buf())
            .or_default()
            .push(snapshot);
    }

    /// Removes and returns the most recent snapshot of `path`.
    pub fn pop(&mut self, path: &Path) -> Option<Snapshot> {
        let stack = self.stacks.get_mut(path)?;
        let snapshot = stack.pop();
        if stack.is_empty() {
            self.stacks.remove(path);
        }
        snapshot
    }

    /// Number of snapshots recorded for `path`.
    #[must_use]
    pub fn depth(&self, path: &Path) -> usize {
        self.stacks.get(path).map_or(0, Vec::len)
    }
}
