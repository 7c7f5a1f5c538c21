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

//! Shared test helpers used across integration suites.
//!
//! Layout: `fixtures.rs` (temporary source trees), `mocks.rs` (scripted
//! analyzer and event recorder), `capture.rs` (in-memory output sinks).

pub mod capture;
pub mod fixtures;
pub mod mocks;
