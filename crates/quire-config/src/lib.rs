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

//! File-backed build configuration.
//!
//! Layout: `model.rs` (typed `BuildConfig` and CLI overrides), `defaults.rs`
//! (default values), `loader.rs` (JSON file discovery and parsing),
//! `validate.rs` (field checks), `error.rs` (error type).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use defaults::{CONFIG_FILE_NAME, DEFAULT_CACHE_FILE};
pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, load_config};
pub use model::{BuildConfig, ConfigOverrides};
pub use validate::validate;
