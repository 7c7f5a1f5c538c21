//! Event payload types carried across the pipeline.

use chrono::{DateTime, Utc};
use quire_core::{FileRecord, LogEvent};

use crate::topics::{FILE_ANALYZED, FILE_IS_CACHED, SYSTEM_LOG};

/// Identifier assigned to each published event.
pub type EventId = u64;

/// Typed events; each variant carries its own payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The file's content matched the cache; carries the stored record.
    FileIsCached {
        /// Record previously stored for the path.
        record: FileRecord,
    },
    /// The file was analysed afresh; carries the new record.
    FileAnalyzed {
        /// Record produced by the analysis.
        record: FileRecord,
    },
    /// Log message for console subscribers.
    Log(LogEvent),
}

impl Event {
    /// Discriminator used to route the event to listeners.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::FileIsCached { .. } => EventKind::FileIsCached,
            Self::FileAnalyzed { .. } => EventKind::FileAnalyzed,
            Self::Log(_) => EventKind::Log,
        }
    }

    /// File record carried by a lifecycle event.
    #[must_use]
    pub const fn record(&self) -> Option<&FileRecord> {
        match self {
            Self::FileIsCached { record } | Self::FileAnalyzed { record } => Some(record),
            Self::Log(_) => None,
        }
    }
}

/// Routing key listeners subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `file.is_cached`
    FileIsCached,
    /// `file.analyzed`
    FileAnalyzed,
    /// `system.log`
    Log,
}

impl EventKind {
    /// Every routable kind.
    pub const ALL: [Self; 3] = [Self::FileIsCached, Self::FileAnalyzed, Self::Log];

    /// Wire-level name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileIsCached => FILE_IS_CACHED,
            Self::FileAnalyzed => FILE_ANALYZED,
            Self::Log => SYSTEM_LOG,
        }
    }

    /// Resolve a wire-level name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and
/// publication timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Sequential identifier, starting at one.
    pub id: EventId,
    /// When the event was published.
    pub timestamp: DateTime<Utc>,
    /// The event itself.
    pub event: Event,
}
