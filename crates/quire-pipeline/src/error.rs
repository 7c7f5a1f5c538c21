//! # Design
//!
//! - Analysis failures are fatal for one file and carry the path they hit.
//! - Listener failures are wrapped, not flattened, so the source chain shows
//!   which event and listener failed.
//! - Recorded per-file problems are data (`ErrorRecord`), never errors here.

use std::error::Error as StdError;
use std::io;
use std::path::{Path, PathBuf};

use quire_events::EventBusError;
use thiserror::Error;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failures raised by an analyzer for a single file.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The file is not valid UTF-8 text.
    #[error("source is not valid utf-8")]
    NotUtf8 {
        /// Byte offset of the first invalid sequence.
        valid_up_to: usize,
    },
    /// A scanning pattern failed to compile.
    #[error("failed to compile analyzer pattern")]
    Pattern {
        /// Pattern that failed.
        pattern: &'static str,
        /// Underlying regex error.
        source: regex::Error,
    },
    /// Analyzer-specific failure.
    #[error("analyzer failed")]
    Failed {
        /// Underlying failure.
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl AnalysisError {
    /// Wrap an arbitrary analyzer failure.
    pub fn failed(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Failed {
            source: source.into(),
        }
    }
}

/// Errors surfaced by the pipeline driver.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The discovery root does not exist.
    #[error("source root missing")]
    RootMissing {
        /// Missing root path.
        path: PathBuf,
    },
    /// Directory traversal failed.
    #[error("failed to walk source tree")]
    Walk {
        /// Path being traversed.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// A source file could not be read.
    #[error("failed to read source file")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The analyzer failed for a file; nothing was cached for it.
    #[error("analysis failed")]
    Analysis {
        /// File path.
        path: PathBuf,
        /// Underlying analyzer error.
        source: AnalysisError,
    },
    /// A lifecycle event listener failed.
    #[error("event listener failed")]
    Listener {
        /// File path whose event failed.
        path: PathBuf,
        /// Underlying dispatch error.
        source: EventBusError,
    },
}

impl PipelineError {
    /// Path the failure relates to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::RootMissing { path }
            | Self::Walk { path, .. }
            | Self::Read { path, .. }
            | Self::Analysis { path, .. }
            | Self::Listener { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_events::EventKind;

    fn assert_error(err: &PipelineError, message: &str, has_source: bool) {
        assert_eq!(err.to_string(), message);
        assert_eq!(err.source().is_some(), has_source);
    }

    #[test]
    fn pipeline_errors_keep_path_and_source() {
        assert_error(
            &PipelineError::RootMissing {
                path: PathBuf::from("docs"),
            },
            "source root missing",
            false,
        );
        assert_error(
            &PipelineError::Read {
                path: PathBuf::from("a.rs"),
                source: io::Error::other("io"),
            },
            "failed to read source file",
            true,
        );
        let err = PipelineError::Analysis {
            path: PathBuf::from("b.rs"),
            source: AnalysisError::NotUtf8 { valid_up_to: 3 },
        };
        assert_error(&err, "analysis failed", true);
        assert_eq!(err.path(), Path::new("b.rs"));

        let err = PipelineError::Listener {
            path: PathBuf::from("c.rs"),
            source: EventBusError::ListenerFailed {
                event_id: 7,
                event_kind: EventKind::FileAnalyzed,
                source: "closed".into(),
            },
        };
        assert_error(&err, "event listener failed", true);
    }

    #[test]
    fn analysis_failed_wraps_source() {
        let err = AnalysisError::failed("parser crashed");
        assert_eq!(err.to_string(), "analyzer failed");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("parser crashed")
        );
    }
}
