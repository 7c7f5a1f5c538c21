//! Event-driven console logger.
//!
//! # Design
//! - Connecting is idempotent: the first `connect` wires three listeners,
//!   later calls do nothing, so output is never duplicated.
//! - Lifecycle events print one file line, then re-publish each recorded
//!   error as a `system.log` event; the log listener filters and prints.
//! - Lines are written in publish order to one shared sink.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use quire_core::{FileRecord, LogEvent, Severity, Verbosity, should_emit};
use quire_events::{Event, EventBus, EventEnvelope, EventKind, ListenerResult};

/// Source tag carried by log events raised by the console logger.
const LOG_SOURCE: &str = "console";

/// Output sink shared by every listener of a logger.
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Renders build progress and recorded errors to a terminal.
pub struct ConsoleLogger {
    output: SharedWriter,
    threshold: Severity,
    connected: AtomicBool,
}

impl ConsoleLogger {
    /// Logger writing to `output` with the threshold implied by `verbosity`.
    pub fn new(output: impl Write + Send + 'static, verbosity: Verbosity) -> Self {
        Self::with_threshold(output, verbosity.threshold())
    }

    /// Logger writing to `output` that emits log lines at or above `threshold`.
    pub fn with_threshold(output: impl Write + Send + 'static, threshold: Severity) -> Self {
        let sink: Box<dyn Write + Send> = Box::new(output);
        Self::from_shared(Arc::new(Mutex::new(sink)), threshold)
    }

    /// Logger writing to a sink the caller also writes to.
    #[must_use]
    pub fn from_shared(output: SharedWriter, threshold: Severity) -> Self {
        Self {
            output,
            threshold,
            connected: AtomicBool::new(false),
        }
    }

    /// Minimum severity rendered.
    #[must_use]
    pub const fn threshold(&self) -> Severity {
        self.threshold
    }

    /// Whether [`connect`](Self::connect) has already wired the listeners.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Subscribe to file lifecycle and log events on `bus`.
    ///
    /// Returns `true` when the listeners were registered and `false` when this
    /// logger was already connected.
    pub fn connect(&self, bus: &EventBus) -> bool {
        if self.connected.swap(true, Ordering::SeqCst) {
            return false;
        }

        let output = Arc::clone(&self.output);
        bus.subscribe(EventKind::FileIsCached, move |bus, envelope| {
            announce_file(&output, bus, envelope, "Found cached file")
        });

        let output = Arc::clone(&self.output);
        bus.subscribe(EventKind::FileAnalyzed, move |bus, envelope| {
            announce_file(&output, bus, envelope, "Parsed modified file")
        });

        let output = Arc::clone(&self.output);
        let threshold = self.threshold;
        bus.subscribe(EventKind::Log, move |_, envelope| {
            if let Event::Log(log) = &envelope.event
                && should_emit(log.priority, threshold)
            {
                write_line(&output, &format_log_line(log))?;
            }
            Ok(())
        });

        true
    }
}

/// Wrap `text` in the console style tag for `priority`.
#[must_use]
pub fn style_message(priority: Severity, text: &str) -> String {
    match priority {
        Severity::Warning => format!("<comment>{text}</comment>"),
        Severity::Error | Severity::Alert | Severity::Critical | Severity::Emergency => {
            format!("<error>{text}</error>")
        }
        Severity::Debug | Severity::Notice | Severity::Info => text.to_string(),
    }
}

/// Console line for a log event: indented, rendered, and styled.
#[must_use]
pub fn format_log_line(event: &LogEvent) -> String {
    format!("  {}", style_message(event.priority, &event.rendered()))
}

fn announce_file(
    output: &SharedWriter,
    bus: &EventBus,
    envelope: &EventEnvelope,
    label: &str,
) -> ListenerResult {
    let Some(record) = envelope.event.record() else {
        return Ok(());
    };
    write_line(output, &format!("{label} {}", record.path().display()))?;
    publish_errors(bus, record)
}

fn publish_errors(bus: &EventBus, record: &FileRecord) -> ListenerResult {
    for error in &record.errors {
        bus.publish(Event::Log(LogEvent::from_error(LOG_SOURCE, error)))?;
    }
    Ok(())
}

fn write_line(output: &SharedWriter, line: &str) -> io::Result<()> {
    let mut sink = output.lock().unwrap_or_else(PoisonError::into_inner);
    writeln!(sink, "{line}")?;
    sink.flush()
}
