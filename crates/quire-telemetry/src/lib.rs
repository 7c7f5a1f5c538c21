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

//! Console output, diagnostics, and metrics for Quire builds.
//!
//! Layout: `console.rs` (the event-driven console logger and its severity
//! formatter), `init.rs` (tracing subscriber setup), `metrics.rs` (Prometheus
//! counters fed from the event bus), `error.rs` (error type).

pub mod console;
pub mod error;
pub mod init;
pub mod metrics;

pub use console::{ConsoleLogger, SharedWriter, format_log_line, style_message};
pub use error::{CounterStep, TelemetryError, TelemetryResult};
pub use init::{
    DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_version, init_logging,
    log_format_from_setting,
};
pub use metrics::{Metrics, MetricsSnapshot};
