#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! File-level incremental cache.
//!
//! # Design
//! - `FileCache` is a point lookup/point write store keyed by path; it never
//!   decides cache validity itself, callers compare fingerprints.
//! - Lookups have no side effects and stores replace whole records.
//! - Persistence lives in `JsonFileCache`; its IO failures are reported through
//!   `open`/`flush`, never through `lookup`/`store`.
//! - Records for files that left the source set are dropped with
//!   `retain_paths` before the cache is written back.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use quire_core::FileRecord;

pub mod error;
pub mod memory;
pub mod persistent;

pub use error::{CacheError, CacheResult};
pub use memory::MemoryFileCache;
pub use persistent::{CACHE_FORMAT_VERSION, JsonFileCache};

/// Point lookup and point write store of analysed files.
pub trait FileCache {
    /// Record previously stored for `path`, if any.
    fn lookup(&self, path: &Path) -> Option<FileRecord>;

    /// Store `record` under its own path, replacing any previous record.
    fn store(&mut self, record: FileRecord);

    /// Drop the record for `path`, returning it if present.
    fn remove(&mut self, path: &Path) -> Option<FileRecord>;

    /// Number of stored records.
    fn len(&self) -> usize;

    /// Whether the cache holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored records ordered by path.
    fn records(&self) -> Vec<FileRecord>;

    /// Drop every record whose path is not in `keep` and return the dropped
    /// paths, ordered by path.
    fn retain_paths(&mut self, keep: &[PathBuf]) -> Vec<PathBuf> {
        let keep: BTreeSet<&Path> = keep.iter().map(PathBuf::as_path).collect();
        let stale: Vec<PathBuf> = self
            .records()
            .into_iter()
            .map(|record| record.path)
            .filter(|path| !keep.contains(path.as_path()))
            .collect();
        for path in &stale {
            self.remove(path);
        }
        stale
    }
}
