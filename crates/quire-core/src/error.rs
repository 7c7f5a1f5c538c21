//! Error types for parsing core domain values.

use thiserror::Error;

/// Raised when a severity or verbosity name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity level")]
pub struct ParseSeverityError {
    /// Value supplied by the caller.
    pub value: String,
}
