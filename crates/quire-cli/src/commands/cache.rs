use anyhow::Context;
use quire_cache::{FileCache, JsonFileCache};
use quire_telemetry::SharedWriter;

use crate::cli::{CacheClearArgs, CacheShowArgs, LoggingArgs};
use crate::commands::{init_diagnostics, resolve_cache_path};
use crate::error::{CliError, CliResult};
use crate::output::{render_cache_records, write_output};

pub(crate) fn handle_cache_show(
    args: &CacheShowArgs,
    logging: &LoggingArgs,
    output: &SharedWriter,
) -> CliResult<()> {
    let (config, path) =
        resolve_cache_path(args.root.as_deref(), args.cache.as_deref(), logging)?;
    init_diagnostics(&config.log_level, &config.log_format);

    let cache = JsonFileCache::open(&path)
        .with_context(|| format!("failed to open cache {}", path.display()))
        .map_err(CliError::failure)?;
    let records = cache.records();
    tracing::debug!(path = %path.display(), records = records.len(), "loaded cache");
    render_cache_records(&records, args.output, output)
}

pub(crate) fn handle_cache_clear(
    args: &CacheClearArgs,
    logging: &LoggingArgs,
    output: &SharedWriter,
) -> CliResult<()> {
    let (config, path) =
        resolve_cache_path(args.root.as_deref(), args.cache.as_deref(), logging)?;
    init_diagnostics(&config.log_level, &config.log_format);

    let removed = JsonFileCache::remove_file(&path)
        .with_context(|| format!("failed to remove cache {}", path.display()))
        .map_err(CliError::failure)?;
    let message = if removed {
        format!("Removed cache file {}", path.display())
    } else {
        format!("No cache file at {}", path.display())
    };
    write_output(output, &message)
}
