//! Event bus error primitives.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use crate::payloads::{EventId, EventKind};

/// Failure returned by a listener callback.
pub type ListenerError = Box<dyn Error + Send + Sync>;

/// Result type returned by listener callbacks.
pub type ListenerResult = Result<(), ListenerError>;

/// Error emitted when event dispatch fails.
#[derive(Debug)]
pub enum EventBusError {
    /// A listener failed while handling the event; later listeners were skipped.
    ListenerFailed {
        /// Identifier assigned to the event.
        event_id: EventId,
        /// Kind of the event being dispatched.
        event_kind: EventKind,
        /// Failure reported by the listener.
        source: ListenerError,
    },
}

impl EventBusError {
    /// Identifier assigned to the event when the failure occurred.
    #[must_use]
    pub const fn event_id(&self) -> EventId {
        match self {
            Self::ListenerFailed { event_id, .. } => *event_id,
        }
    }

    /// Kind of the event whose dispatch failed.
    #[must_use]
    pub const fn event_kind(&self) -> EventKind {
        match self {
            Self::ListenerFailed { event_kind, .. } => *event_kind,
        }
    }
}

impl Display for EventBusError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("event listener failed")
    }
}

impl Error for EventBusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ListenerFailed { source, .. } => Some(source.as_ref()),
        }
    }
}

/// Result wrapper for event bus operations.
pub type EventBusResult<T> = Result<T, EventBusError>;
