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

//! Domain types shared across the Quire workspace.
//!
//! Layout: `severity.rs` (ordered log levels and the verbosity threshold),
//! `fingerprint.rs` (content hashing), `record.rs` (file and error records kept
//! by the cache), `log.rs` (transient log payloads), `template.rs` (positional
//! message substitution), `error.rs` (parse failures).

pub mod error;
pub mod fingerprint;
pub mod log;
pub mod record;
pub mod severity;
pub mod template;

pub use error::ParseSeverityError;
pub use fingerprint::Fingerprint;
pub use log::LogEvent;
pub use record::{ErrorRecord, FileRecord};
pub use severity::{Severity, Verbosity, should_emit};
pub use template::render_template;
