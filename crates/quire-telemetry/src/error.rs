//! Error types for telemetry operations.
//!
//! `Display` names the metric or file involved; the underlying error is only
//! reachable through `source`.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;

use prometheus::Error as PrometheusError;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Step of counter setup that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStep {
    /// Constructing the collector from its options.
    Build,
    /// Adding the collector to the registry.
    Register,
}

impl CounterStep {
    const fn verb(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Register => "register",
        }
    }
}

/// Errors raised by telemetry helpers.
#[derive(Debug)]
pub enum TelemetryError {
    /// A global tracing subscriber could not be installed.
    LoggingInstall {
        /// Underlying tracing subscriber error.
        source: TryInitError,
    },
    /// A build counter could not be set up.
    Counter {
        /// Counter name.
        name: &'static str,
        /// Setup step that failed.
        step: CounterStep,
        /// Underlying Prometheus error.
        source: PrometheusError,
    },
    /// The registry could not be encoded as exposition text.
    Encode {
        /// Underlying Prometheus error.
        source: PrometheusError,
    },
    /// The encoded exposition text was not UTF-8.
    NotUtf8 {
        /// Underlying conversion error.
        source: FromUtf8Error,
    },
    /// The metrics file or its directory could not be written.
    MetricsFile {
        /// Target file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

impl TelemetryError {
    pub(crate) fn counter(
        name: &'static str,
        step: CounterStep,
    ) -> impl FnOnce(PrometheusError) -> Self {
        move |source| Self::Counter { name, step, source }
    }

    pub(crate) fn metrics_file(path: &Path) -> impl Fn(io::Error) -> Self + '_ {
        move |source| Self::MetricsFile {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoggingInstall { .. } => {
                formatter.write_str("failed to install diagnostic logging")
            }
            Self::Counter { name, step, .. } => {
                write!(formatter, "failed to {} counter {name}", step.verb())
            }
            Self::Encode { .. } => formatter.write_str("failed to encode build metrics"),
            Self::NotUtf8 { .. } => formatter.write_str("encoded build metrics are not utf-8"),
            Self::MetricsFile { path, .. } => {
                write!(formatter, "failed to write metrics file {}", path.display())
            }
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LoggingInstall { source } => Some(source),
            Self::Counter { source, .. } | Self::Encode { source } => Some(source),
            Self::NotUtf8 { source } => Some(source),
            Self::MetricsFile { source, .. } => Some(source),
        }
    }
}
