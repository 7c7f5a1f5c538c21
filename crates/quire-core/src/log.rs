//! Transient log payloads dispatched on the `system.log` channel.

use crate::record::ErrorRecord;
use crate::severity::Severity;
use crate::template::render_template;

/// A single log message; built per dispatch and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Component that raised the message.
    pub source: &'static str,
    /// Severity used for threshold filtering and styling.
    pub priority: Severity,
    /// Message template.
    pub message: String,
    /// Values substituted into the template, in order.
    pub context: Vec<String>,
}

impl LogEvent {
    /// Build a log event from its parts.
    #[must_use]
    pub fn new(
        source: &'static str,
        priority: Severity,
        message: impl Into<String>,
        context: Vec<String>,
    ) -> Self {
        Self {
            source,
            priority,
            message: message.into(),
            context,
        }
    }

    /// Re-express a recorded file error as a log event.
    #[must_use]
    pub fn from_error(source: &'static str, error: &ErrorRecord) -> Self {
        Self {
            source,
            priority: error.severity(),
            message: error.code().to_string(),
            context: error.context().to_vec(),
        }
    }

    /// Message with the context substituted into the template.
    #[must_use]
    pub fn rendered(&self) -> String {
        render_template(&self.message, &self.context)
    }
}
