//! Cache-or-analyse orchestration.

use std::fs;
use std::path::Path;

use quire_cache::FileCache;
use quire_core::{FileRecord, Fingerprint};
use quire_events::{Event, EventBus};
use tracing::{debug, error, info};

use crate::analyzer::Analyzer;
use crate::error::{PipelineError, PipelineResult};

/// Knobs for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Ignore cached records and analyse every file.
    pub force: bool,
    /// Abort the run on the first failed file.
    pub fail_fast: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            force: false,
            fail_fast: true,
        }
    }
}

/// Which lifecycle branch a processed file took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The cached record was reused.
    Cached,
    /// The file was analysed afresh.
    Analyzed,
}

/// Totals for a run over many files.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Files served from the cache.
    pub cached: usize,
    /// Files analysed afresh.
    pub analyzed: usize,
    /// Recorded errors across every processed file.
    pub recorded_errors: usize,
    /// Files that failed; only populated when `fail_fast` is off.
    pub failures: Vec<PipelineError>,
}

impl RunSummary {
    /// Files processed successfully.
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.cached + self.analyzed
    }

    /// Whether every file was processed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives files through the cache, the analyzer, and the event bus.
pub struct AnalysisPipeline<C, A> {
    cache: C,
    analyzer: A,
    bus: EventBus,
    options: PipelineOptions,
}

impl<C, A> AnalysisPipeline<C, A>
where
    C: FileCache,
    A: Analyzer,
{
    /// Construct a pipeline with default options.
    pub fn new(cache: C, analyzer: A, bus: EventBus) -> Self {
        Self {
            cache,
            analyzer,
            bus,
            options: PipelineOptions::default(),
        }
    }

    /// Replace the run options.
    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Bus lifecycle events are published on.
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Cache backing the pipeline.
    pub const fn cache(&self) -> &C {
        &self.cache
    }

    /// Mutable access to the cache, e.g. to flush it.
    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    /// Consume the pipeline, returning its cache.
    pub fn into_cache(self) -> C {
        self.cache
    }

    /// Process a single file and return its current record.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the analyzer fails, or a
    /// lifecycle listener fails. A failed analysis leaves the cache untouched.
    pub fn process_file(&mut self, path: &Path) -> PipelineResult<FileRecord> {
        self.process(path).map(|(_, record)| record)
    }

    /// Process `paths` in order.
    ///
    /// # Errors
    ///
    /// With `fail_fast` set, returns the first file failure. Otherwise failures
    /// are collected in [`RunSummary::failures`] and the run continues.
    pub fn run<I, P>(&mut self, paths: I) -> PipelineResult<RunSummary>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut summary = RunSummary::default();
        for path in paths {
            let path = path.as_ref();
            match self.process(path) {
                Ok((outcome, record)) => {
                    summary.recorded_errors += record.error_count();
                    match outcome {
                        ProcessOutcome::Cached => summary.cached += 1,
                        ProcessOutcome::Analyzed => summary.analyzed += 1,
                    }
                }
                Err(err) if self.options.fail_fast => return Err(err),
                Err(err) => {
                    error!(path = %path.display(), error = %err, "file failed; continuing");
                    summary.failures.push(err);
                }
            }
        }

        info!(
            cached = summary.cached,
            analyzed = summary.analyzed,
            recorded_errors = summary.recorded_errors,
            failed = summary.failures.len(),
            "pipeline run finished"
        );
        Ok(summary)
    }

    fn process(&mut self, path: &Path) -> PipelineResult<(ProcessOutcome, FileRecord)> {
        let contents = fs::read(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let fingerprint = Fingerprint::of_bytes(&contents);

        if !self.options.force {
            if let Some(record) = self
                .cache
                .lookup(path)
                .filter(|record| record.is_current(&fingerprint))
            {
                debug!(path = %path.display(), "fingerprint unchanged; reusing cached record");
                self.publish(path, Event::FileIsCached {
                    record: record.clone(),
                })?;
                return Ok((ProcessOutcome::Cached, record));
            }
        }

        let errors = self
            .analyzer
            .analyze(path, &contents)
            .map_err(|source| PipelineError::Analysis {
                path: path.to_path_buf(),
                source,
            })?;
        let record = FileRecord::new(path, fingerprint, errors);
        debug!(
            path = %path.display(),
            errors = record.error_count(),
            "analysed file"
        );

        self.cache.store(record.clone());
        self.publish(path, Event::FileAnalyzed {
            record: record.clone(),
        })?;
        Ok((ProcessOutcome::Analyzed, record))
    }

    fn publish(&self, path: &Path, event: Event) -> PipelineResult<()> {
        self.bus
            .publish(event)
            .map(|_| ())
            .map_err(|source| PipelineError::Listener {
                path: path.to_path_buf(),
                source,
            })
    }
}
