//! Command handlers grouped by concern.

pub(crate) mod cache;
pub(crate) mod parse;

use std::path::{Path, PathBuf};

use quire_config::{BuildConfig, ConfigOverrides, load_config};
use quire_telemetry::{LoggingConfig, init_logging, log_format_from_setting};

use crate::cli::LoggingArgs;
use crate::error::CliResult;

/// Install diagnostic logging for a command.
///
/// A subscriber installed earlier in the process keeps precedence, so a
/// failed install is not an error.
pub(crate) fn init_diagnostics(level: &str, format: &str) {
    let config = LoggingConfig {
        level,
        format: log_format_from_setting(format),
        build_version: env!("CARGO_PKG_VERSION"),
    };
    if init_logging(&config).is_err() {
        tracing::debug!("diagnostic logging already installed");
    }
}

/// Resolve the cache path for commands that only touch the cache: an explicit
/// path wins, otherwise the configuration of `root` (default `.`) decides,
/// matching what `parse` over the same root uses.
pub(crate) fn resolve_cache_path(
    root: Option<&Path>,
    cache: Option<&Path>,
    logging: &LoggingArgs,
) -> CliResult<(BuildConfig, PathBuf)> {
    let config = load_config(
        root.unwrap_or_else(|| Path::new(".")),
        None,
        ConfigOverrides {
            cache_path: cache.map(Path::to_path_buf),
            log_level: logging.log_level.clone(),
            log_format: logging.log_format.clone(),
            ..ConfigOverrides::default()
        },
    )?;
    let path = config.effective_cache_path();
    Ok((config, path))
}
