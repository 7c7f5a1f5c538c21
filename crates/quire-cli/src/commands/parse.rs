use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use quire_cache::{FileCache, JsonFileCache};
use quire_config::{BuildConfig, ConfigOverrides, load_config};
use quire_events::EventBus;
use quire_pipeline::{
    AnalysisPipeline, DiscoveryOptions, DocCommentAnalyzer, PipelineError, PipelineOptions,
    RunSummary, discover_sources,
};
use quire_telemetry::{ConsoleLogger, Metrics, SharedWriter};
use tracing::{info, info_span, warn};
use uuid::Uuid;

use crate::cli::{LoggingArgs, ParseArgs};
use crate::commands::init_diagnostics;
use crate::error::{CliError, CliResult};

pub(crate) fn handle_parse(
    args: ParseArgs,
    logging: &LoggingArgs,
    output: &SharedWriter,
) -> CliResult<()> {
    let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = load_config(&root, args.config.clone(), overrides(args, logging))?;
    init_diagnostics(&config.log_level, &config.log_format);

    let run_id = Uuid::new_v4();
    let span = info_span!("parse", %run_id, root = %root.display());
    let _entered = span.enter();

    let sources = discover(&config)?;
    let cache_path = config.effective_cache_path();
    let cache = JsonFileCache::open(&cache_path)
        .with_context(|| format!("failed to open cache {}", cache_path.display()))
        .map_err(CliError::failure)?;
    info!(
        sources = sources.len(),
        cached_records = cache.len(),
        cache = %cache_path.display(),
        "starting build"
    );

    let bus = EventBus::new();
    let logger = ConsoleLogger::from_shared(Arc::clone(output), config.verbosity.threshold());
    logger.connect(&bus);
    let metrics = config
        .metrics_path
        .as_ref()
        .map(|_| -> CliResult<Metrics> {
            let metrics = Metrics::new().map_err(CliError::failure)?;
            metrics.connect(&bus);
            Ok(metrics)
        })
        .transpose()?;

    let analyzer = DocCommentAnalyzer::new().map_err(CliError::failure)?;
    let mut pipeline = AnalysisPipeline::new(cache, analyzer, bus).with_options(PipelineOptions {
        force: config.force,
        fail_fast: config.fail_fast,
    });
    let outcome = pipeline.run(&sources);

    let dropped = pipeline.cache_mut().retain_paths(&sources);
    if !dropped.is_empty() {
        info!(dropped = dropped.len(), "dropped cached records for vanished files");
    }

    // Records stored before a failure are still worth keeping.
    pipeline
        .cache_mut()
        .flush()
        .with_context(|| format!("failed to write cache {}", cache_path.display()))
        .map_err(CliError::failure)?;

    if let (Some(metrics), Some(path)) = (&metrics, &config.metrics_path) {
        metrics.write_to(path).map_err(CliError::failure)?;
    }

    let summary = outcome.map_err(|err| {
        let path = err.path().display().to_string();
        CliError::failure(anyhow::Error::new(err).context(format!("failed to process {path}")))
    })?;
    finish(&summary)
}

fn overrides(args: ParseArgs, logging: &LoggingArgs) -> ConfigOverrides {
    ConfigOverrides {
        cache_path: args.cache,
        extensions: args.extensions,
        include_hidden: args.include_hidden,
        keep_going: args.keep_going,
        force: args.force,
        debug: args.debug,
        log_level: logging.log_level.clone(),
        log_format: logging.log_format.clone(),
        metrics_path: args.metrics,
    }
}

fn discover(config: &BuildConfig) -> CliResult<Vec<PathBuf>> {
    let options = DiscoveryOptions {
        extensions: config.extensions.clone(),
        include_hidden: config.include_hidden,
    };
    discover_sources(config.source_root(), &options).map_err(|err| match err {
        PipelineError::RootMissing { path } => {
            CliError::validation(format!("source root {} does not exist", path.display()))
        }
        other => CliError::failure(other),
    })
}

fn finish(summary: &RunSummary) -> CliResult<()> {
    info!(
        cached = summary.cached,
        analyzed = summary.analyzed,
        recorded_errors = summary.recorded_errors,
        "build finished"
    );
    if summary.is_clean() {
        return Ok(());
    }

    for failure in &summary.failures {
        warn!(path = %failure.path().display(), error = %failure, "file skipped");
    }
    let paths: Vec<String> = summary
        .failures
        .iter()
        .map(|failure| failure.path().display().to_string())
        .collect();
    Err(CliError::failure(anyhow!(
        "{} file(s) failed to process: {}",
        paths.len(),
        paths.join(", ")
    )))
}
