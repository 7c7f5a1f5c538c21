//! JSON-backed cache persisted between runs.
//!
//! # Design
//! - The whole cache is one versioned JSON document loaded on `open`.
//! - An unreadable or foreign document is discarded with a warning; the next
//!   run simply re-analyses everything.
//! - `flush` writes to a sibling temp file and renames it into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quire_core::FileRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::FileCache;
use crate::error::{CacheError, CacheResult};
use crate::memory::MemoryFileCache;

/// Version written into the cache document; other versions are discarded.
pub const CACHE_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct CacheDocument {
    version: u32,
    #[serde(default)]
    records: Vec<FileRecord>,
}

/// Cache persisted as a JSON document at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    path: PathBuf,
    inner: MemoryFileCache,
    dirty: bool,
}

impl JsonFileCache {
    /// Load the cache stored at `path`.
    ///
    /// A missing file yields an empty cache. A document that cannot be parsed
    /// or was written by another format version is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> CacheResult<Self> {
        let path = path.into();
        let inner = match fs::read_to_string(&path) {
            Ok(raw) => parse_document(&path, &raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no cache file yet; starting empty");
                MemoryFileCache::new()
            }
            Err(err) => return Err(CacheError::io("cache.read", &path, err)),
        };
        Ok(Self {
            path,
            inner,
            dirty: false,
        })
    }

    /// Start with an empty cache that will be written to `path` on flush.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: MemoryFileCache::new(),
            dirty: false,
        }
    }

    /// Location of the cache document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether records changed since the last load or flush.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the cache document if anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// document cannot be serialised or written.
    pub fn flush(&mut self) -> CacheResult<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| CacheError::io("cache.create_dir", parent, err))?;
        }

        let document = CacheDocument {
            version: CACHE_FORMAT_VERSION,
            records: self.inner.records(),
        };
        let serialised = serde_json::to_string_pretty(&document)
            .map_err(|err| CacheError::json("cache.serialize", &self.path, err))?;

        let staging = staging_path(&self.path);
        fs::write(&staging, serialised)
            .map_err(|err| CacheError::io("cache.write", &staging, err))?;
        fs::rename(&staging, &self.path)
            .map_err(|err| CacheError::io("cache.rename", &self.path, err))?;

        debug!(path = %self.path.display(), records = self.inner.len(), "cache flushed");
        self.dirty = false;
        Ok(())
    }

    /// Delete the cache document at `path`. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn remove_file(path: &Path) -> CacheResult<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(CacheError::io("cache.remove", path, err)),
        }
    }
}

impl FileCache for JsonFileCache {
    fn lookup(&self, path: &Path) -> Option<FileRecord> {
        self.inner.lookup(path)
    }

    fn store(&mut self, record: FileRecord) {
        self.inner.store(record);
        self.dirty = true;
    }

    fn remove(&mut self, path: &Path) -> Option<FileRecord> {
        let removed = self.inner.remove(path);
        self.dirty |= removed.is_some();
        removed
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn records(&self) -> Vec<FileRecord> {
        self.inner.records()
    }
}

fn parse_document(path: &Path, raw: &str) -> MemoryFileCache {
    match serde_json::from_str::<CacheDocument>(raw) {
        Ok(document) if document.version == CACHE_FORMAT_VERSION => {
            document.records.into_iter().collect()
        }
        Ok(document) => {
            warn!(
                path = %path.display(),
                found = document.version,
                expected = CACHE_FORMAT_VERSION,
                "discarding cache written by another format version"
            );
            MemoryFileCache::new()
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "discarding unreadable cache");
            MemoryFileCache::new()
        }
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
