//! Ordered severities and the verbosity threshold that filters them.
//!
//! # Design
//! - Severities form a strict total order; the derived `Ord` follows variant order.
//! - The threshold is a plain value chosen once at startup, never a global.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseSeverityError;

/// Priority attached to recorded errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Diagnostic detail only shown in debug runs.
    Debug,
    /// Normal but noteworthy condition.
    Notice,
    /// Informational message.
    Info,
    /// Something looks wrong but output is still usable.
    Warning,
    /// Documentation is missing or broken.
    Error,
    /// Action must be taken immediately.
    Alert,
    /// Critical condition.
    Critical,
    /// The result is unusable.
    Emergency,
}

impl Severity {
    /// Every severity, lowest first.
    pub const ALL: [Self; 8] = [
        Self::Debug,
        Self::Notice,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Alert,
        Self::Critical,
        Self::Emergency,
    ];

    /// Lowercase level name, matching the serialised form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Alert => "alert",
            Self::Critical => "critical",
            Self::Emergency => "emergency",
        }
    }

    /// Whether the level belongs to the error family (error and above).
    #[must_use]
    pub fn is_error(self) -> bool {
        self >= Self::Error
    }
}

impl Display for Severity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ParseSeverityError {
                value: value.to_string(),
            })
    }
}

/// Output verbosity selected on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Only error-family log lines are rendered.
    #[default]
    Normal,
    /// Every log line is rendered.
    Debug,
}

impl Verbosity {
    /// Minimum severity rendered at this verbosity.
    #[must_use]
    pub const fn threshold(self) -> Severity {
        match self {
            Self::Normal => Severity::Error,
            Self::Debug => Severity::Debug,
        }
    }
}

impl FromStr for Verbosity {
    type Err = ParseSeverityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "debug" => Ok(Self::Debug),
            _ => Err(ParseSeverityError {
                value: value.to_string(),
            }),
        }
    }
}

/// Returns `true` when `priority` meets or exceeds `threshold`.
#[must_use]
pub fn should_emit(priority: Severity, threshold: Severity) -> bool {
    priority >= threshold
}
