//! Event topic identifiers used for listener registration.

/// Published when a file's fingerprint matched its cached record.
pub const FILE_IS_CACHED: &str = "file.is_cached";
/// Published after a file was (re)analysed.
pub const FILE_ANALYZED: &str = "file.analyzed";
/// Generic log channel.
pub const SYSTEM_LOG: &str = "system.log";
