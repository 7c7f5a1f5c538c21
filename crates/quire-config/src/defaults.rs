//! Default values for build configuration.
//!
//! # Design
//! - Keep defaults in one place so the model, the loader, and the CLI agree.

/// File name looked up in the source root when no config file is given.
pub const CONFIG_FILE_NAME: &str = "quire.json";
/// Cache location relative to the source root.
pub const DEFAULT_CACHE_FILE: &str = ".quire/cache.json";
/// Extension analysed when none is configured.
pub(crate) const DEFAULT_EXTENSION: &str = "rs";
/// Default `tracing` level directive.
pub(crate) const DEFAULT_LOG_LEVEL: &str = "warn";
/// Default log output format.
pub(crate) const DEFAULT_LOG_FORMAT: &str = "pretty";
/// Accepted `tracing` level names.
pub(crate) const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
/// Accepted log output formats.
pub(crate) const LOG_FORMATS: [&str; 2] = ["pretty", "json"];
