//! # Design
//!
//! - Constant-message errors for cache persistence.
//! - Paths and operations are captured as fields, not interpolated into messages.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for cache persistence.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors produced while loading or writing the persistent cache.
#[derive(Debug, Error)]
pub enum CacheError {
    /// IO failures while touching the cache file.
    #[error("cache io failure")]
    Io {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// JSON serialisation failures for the cache document.
    #[error("cache json failure")]
    Json {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

impl CacheError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: serde_json::Error,
    ) -> Self {
        Self::Json {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Path the failing operation was working on.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } => path.as_path(),
        }
    }
}
