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

//! Core event bus for the Quire build pipeline.
//!
//! The bus delivers typed events synchronously to listeners registered for the
//! event's kind, in registration order, on the publishing thread. Listeners may
//! publish further events from inside a callback; a failing listener stops the
//! dispatch and the failure is returned to the publisher.
//!
//! Layout: `payloads.rs` (event union and envelope), `topics.rs` (wire names),
//! `routing.rs` (listener registry and dispatch), `error.rs` (dispatch failures).

pub mod error;
pub mod payloads;
pub mod routing;
pub mod topics;

pub use error::{EventBusError, EventBusResult, ListenerError, ListenerResult};
pub use payloads::{Event, EventEnvelope, EventId, EventKind};
pub use routing::{EventBus, Listener, ListenerId};
pub use topics::{FILE_ANALYZED, FILE_IS_CACHED, SYSTEM_LOG};
