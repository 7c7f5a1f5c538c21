//! Listener registry and synchronous dispatch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::trace;

use crate::error::{EventBusError, EventBusResult, ListenerResult};
use crate::payloads::{Event, EventEnvelope, EventId, EventKind};

/// Callback invoked for each event of the kind it was registered for.
///
/// The bus is passed back in so listeners can publish follow-up events
/// without holding a reference to it.
pub type Listener = Arc<dyn Fn(&EventBus, &EventEnvelope) -> ListenerResult + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    kind: EventKind,
    listener: Listener,
}

/// Shared, cloneable event bus. Clones deliver to the same listeners.
#[derive(Clone)]
pub struct EventBus {
    listeners: Arc<Mutex<Vec<Registration>>>,
    next_event_id: Arc<AtomicU64>,
    next_listener_id: Arc<AtomicU64>,
}

impl EventBus {
    /// Construct an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_event_id: Arc::new(AtomicU64::new(1)),
            next_listener_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register `listener` for events of `kind`. Listeners run in the order
    /// they were registered.
    pub fn subscribe<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&Self, &EventEnvelope) -> ListenerResult + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.lock_listeners().push(Registration {
            id,
            kind,
            listener: Arc::new(listener),
        });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    ///
    /// Removing a listener while an event is being dispatched does not affect
    /// that dispatch; callers should not rely on it taking effect mid-flight.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        let before = listeners.len();
        listeners.retain(|registration| registration.id != id);
        listeners.len() != before
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.lock_listeners()
            .iter()
            .filter(|registration| registration.kind == kind)
            .count()
    }

    /// Deliver `event` to every listener registered for its kind and return the
    /// identifier assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`EventBusError::ListenerFailed`] for the first listener that
    /// fails; listeners registered after it do not see the event.
    pub fn publish(&self, event: Event) -> EventBusResult<EventId> {
        let id = self.next_event_id.fetch_add(1, Ordering::Relaxed);
        let kind = event.kind();
        let envelope = EventEnvelope {
            id,
            timestamp: Utc::now(),
            event,
        };

        // Listeners may publish or subscribe, so the lock is released before
        // any callback runs.
        let targets: Vec<Listener> = self
            .lock_listeners()
            .iter()
            .filter(|registration| registration.kind == kind)
            .map(|registration| Arc::clone(&registration.listener))
            .collect();

        trace!(event_id = id, kind = kind.as_str(), listeners = targets.len(), "dispatching event");

        for listener in targets {
            listener(self, &envelope).map_err(|source| EventBusError::ListenerFailed {
                event_id: id,
                event_kind: kind,
                source,
            })?;
        }
        Ok(id)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<Registration>> {
        self.listeners
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
