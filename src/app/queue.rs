use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue index {index} out of range (queue has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Pending tracks plus the position of the next one to auto-play.
///
/// `cursor <= items.len()` always holds; a path is never queued twice.
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    items: Vec<PathBuf>,
    cursor: usize,
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[PathBuf] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.items.get(index).map(PathBuf::as_path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.items.iter().any(|p| p == path)
    }

    /// Append `path`. Returns false (and changes nothing) if already queued.
    pub fn enqueue(&mut self, path: PathBuf) -> bool {
        if self.contains(&path) {
            return false;
        }
        self.items.push(path);
        true
    }

    pub fn remove_at(&mut self, index: usize) -> Result<PathBuf, QueueError> {
        if index >= self.items.len() {
            return Err(QueueError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let removed = self.items.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        }
        self.cursor = self.cursor.min(self.items.len());
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = 0;
    }

    /// Entry at the cursor, without moving past it.
    pub fn peek(&self) -> Option<&Path> {
        self.get(self.cursor)
    }

    /// Take the entry at the cursor and move past it. `None` once exhausted.
    pub fn advance(&mut self) -> Option<PathBuf> {
        let next = self.items.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(next)
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    /// Start over from the first entry.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}
