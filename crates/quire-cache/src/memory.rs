//! In-memory cache backend.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quire_core::FileRecord;

use crate::FileCache;

/// Cache held entirely in memory, ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryFileCache {
    records: BTreeMap<PathBuf, FileRecord>,
}

impl MemoryFileCache {
    /// Construct an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

impl FromIterator<FileRecord> for MemoryFileCache {
    fn from_iter<T: IntoIterator<Item = FileRecord>>(iter: T) -> Self {
        let mut cache = Self::new();
        for record in iter {
            cache.store(record);
        }
        cache
    }
}

impl FileCache for MemoryFileCache {
    fn lookup(&self, path: &Path) -> Option<FileRecord> {
        self.records.get(path).cloned()
    }

    fn store(&mut self, record: FileRecord) {
        self.records.insert(record.path.clone(), record);
    }

    fn remove(&mut self, path: &Path) -> Option<FileRecord> {
        self.records.remove(path)
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn records(&self) -> Vec<FileRecord> {
        self.records.values().cloned().collect()
    }
}
