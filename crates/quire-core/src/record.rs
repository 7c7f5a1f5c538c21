//! File and error records produced by analysis and kept by the cache.
//!
//! # Design
//! - Records are replaced wholesale on re-analysis; nothing mutates them in place.
//! - `ErrorRecord` exposes accessors only so attached errors stay immutable.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::severity::Severity;

/// Structured problem recorded against a file during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    severity: Severity,
    code: String,
    #[serde(default)]
    context: Vec<String>,
}

impl ErrorRecord {
    /// Build a record from a severity, message template, and context values.
    #[must_use]
    pub fn new<I, S>(severity: Severity, code: impl Into<String>, context: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            severity,
            code: code.into(),
            context: context.into_iter().map(Into::into).collect(),
        }
    }

    /// Severity of the problem.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Message template (doubles as the error code).
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Values substituted into the template, in order.
    #[must_use]
    pub fn context(&self) -> &[String] {
        &self.context
    }
}

/// Outcome of analysing one file, keyed by path in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path the record was produced for.
    pub path: PathBuf,
    /// Fingerprint of the content that was analysed.
    pub fingerprint: Fingerprint,
    /// When the analysis ran.
    pub last_analyzed: DateTime<Utc>,
    /// Problems found, in discovery order.
    #[serde(default)]
    pub errors: Vec<ErrorRecord>,
}

impl FileRecord {
    /// Build a record stamped with the current time.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, fingerprint: Fingerprint, errors: Vec<ErrorRecord>) -> Self {
        Self {
            path: path.into(),
            fingerprint,
            last_analyzed: Utc::now(),
            errors,
        }
    }

    /// Path the record was produced for.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the stored fingerprint matches a freshly computed one.
    #[must_use]
    pub fn is_current(&self, fingerprint: &Fingerprint) -> bool {
        &self.fingerprint == fingerprint
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Highest severity among the recorded errors, if any.
    #[must_use]
    pub fn highest_severity(&self) -> Option<Severity> {
        self.errors.iter().map(ErrorRecord::severity).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> FileRecord {
        FileRecord::new(
            "src/lib.rs",
            Fingerprint::of_bytes(b"fn main() {}"),
            vec![
                ErrorRecord::new(Severity::Warning, "W1", ["a"]),
                ErrorRecord::new(Severity::Critical, "C1", Vec::<String>::new()),
                ErrorRecord::new(Severity::Notice, "N1", ["b", "c"]),
            ],
        )
    }

    #[test]
    fn highest_severity_picks_maximum() {
        let record = sample_record();
        assert_eq!(record.error_count(), 3);
        assert_eq!(record.highest_severity(), Some(Severity::Critical));

        let clean = FileRecord::new("a.rs", Fingerprint::of_bytes(b""), Vec::new());
        assert_eq!(clean.highest_severity(), None);
    }

    #[test]
    fn is_current_compares_fingerprints() {
        let record = sample_record();
        assert!(record.is_current(&Fingerprint::of_bytes(b"fn main() {}")));
        assert!(!record.is_current(&Fingerprint::of_bytes(b"fn main() { }")));
    }

    #[test]
    fn record_serialises_with_lowercase_severity() {
        let record = sample_record();
        let json = serde_json::to_value(&record).expect("serialise record");
        assert_eq!(json["errors"][0]["severity"], "warning");
        assert_eq!(json["errors"][2]["context"][1], "c");

        let restored: FileRecord = serde_json::from_value(json).expect("deserialise record");
        assert_eq!(restored, record);
    }
}
