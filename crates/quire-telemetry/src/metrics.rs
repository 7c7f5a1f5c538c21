//! Prometheus counters for build activity.
//!
//! # Design
//! - Collectors live in a private registry so tests and runs never collide.
//! - Counters are fed by a bus listener; the pipeline stays unaware of them.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use quire_core::Severity;
use quire_events::{Event, EventBus, EventKind};

use crate::error::{CounterStep, TelemetryError, TelemetryResult};

/// Prometheus-backed build metrics. Clones share the same counters.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    files_cached_total: IntCounter,
    files_analyzed_total: IntCounter,
    recorded_errors_total: IntCounterVec,
    events_published_total: IntCounterVec,
}

/// Point-in-time counter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Files served from the cache.
    pub files_cached: u64,
    /// Files analysed afresh.
    pub files_analyzed: u64,
    /// Recorded errors across every severity.
    pub recorded_errors: u64,
}

impl Metrics {
    /// Construct the registry with every collector registered.
    ///
    /// # Errors
    ///
    /// Returns an error if a collector cannot be built or registered.
    pub fn new() -> TelemetryResult<Self> {
        let registry = Registry::new();

        let files_cached_total = counter(
            &registry,
            "quire_files_cached_total",
            "Files whose cached analysis was reused",
        )?;
        let files_analyzed_total = counter(
            &registry,
            "quire_files_analyzed_total",
            "Files analysed because they were new or changed",
        )?;
        let recorded_errors_total = counter_vec(
            &registry,
            "quire_recorded_errors_total",
            "Recorded documentation errors by severity",
            "severity",
        )?;
        let events_published_total = counter_vec(
            &registry,
            "quire_events_published_total",
            "Events published on the build bus by kind",
            "kind",
        )?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                files_cached_total,
                files_analyzed_total,
                recorded_errors_total,
                events_published_total,
            }),
        })
    }

    /// Count one published event.
    pub fn observe(&self, event: &Event) {
        self.inner
            .events_published_total
            .with_label_values(&[event.kind().as_str()])
            .inc();

        match event {
            Event::FileIsCached { record } => {
                self.inner.files_cached_total.inc();
                self.count_errors(record.errors.iter().map(quire_core::ErrorRecord::severity));
            }
            Event::FileAnalyzed { record } => {
                self.inner.files_analyzed_total.inc();
                self.count_errors(record.errors.iter().map(quire_core::ErrorRecord::severity));
            }
            Event::Log(_) => {}
        }
    }

    /// Subscribe to every event kind on `bus`.
    pub fn connect(&self, bus: &EventBus) {
        for kind in EventKind::ALL {
            let metrics = self.clone();
            bus.subscribe(kind, move |_, envelope| {
                metrics.observe(&envelope.event);
                Ok(())
            });
        }
    }

    /// Current counter values.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let recorded_errors = Severity::ALL
            .into_iter()
            .map(|level| {
                self.inner
                    .recorded_errors_total
                    .with_label_values(&[level.as_str()])
                    .get()
            })
            .sum();
        MetricsSnapshot {
            files_cached: self.inner.files_cached_total.get(),
            files_analyzed: self.inner.files_analyzed_total.get(),
            recorded_errors,
        }
    }

    /// Render the registry in the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> TelemetryResult<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::Encode { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::NotUtf8 { source })
    }

    /// Render and write the metrics to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the file cannot be written.
    pub fn write_to(&self, path: &Path) -> TelemetryResult<()> {
        let rendered = self.render()?;
        let write_error = TelemetryError::metrics_file(path);
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(&write_error)?;
        }
        fs::write(path, rendered).map_err(write_error)
    }

    fn count_errors(&self, severities: impl Iterator<Item = Severity>) {
        for severity in severities {
            self.inner
                .recorded_errors_total
                .with_label_values(&[severity.as_str()])
                .inc();
        }
    }
}

fn counter(registry: &Registry, name: &'static str, help: &str) -> TelemetryResult<IntCounter> {
    let collector = IntCounter::with_opts(Opts::new(name, help))
        .map_err(TelemetryError::counter(name, CounterStep::Build))?;
    registry
        .register(Box::new(collector.clone()))
        .map_err(TelemetryError::counter(name, CounterStep::Register))?;
    Ok(collector)
}

fn counter_vec(
    registry: &Registry,
    name: &'static str,
    help: &str,
    label: &str,
) -> TelemetryResult<IntCounterVec> {
    let collector = IntCounterVec::new(Opts::new(name, help), &[label])
        .map_err(TelemetryError::counter(name, CounterStep::Build))?;
    registry
        .register(Box::new(collector.clone()))
        .map_err(TelemetryError::counter(name, CounterStep::Register))?;
    Ok(collector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use quire_core::{ErrorRecord, FileRecord, Fingerprint, LogEvent};

    fn record(errors: Vec<ErrorRecord>) -> FileRecord {
        FileRecord::new("A.src", Fingerprint::of_bytes(b"a"), errors)
    }

    #[test]
    fn observe_counts_files_errors_and_events() -> Result<()> {
        let metrics = Metrics::new()?;
        let errors = vec![
            ErrorRecord::new(Severity::Warning, "W1", Vec::<String>::new()),
            ErrorRecord::new(Severity::Error, "E1", Vec::<String>::new()),
        ];
        metrics.observe(&Event::FileAnalyzed {
            record: record(errors.clone()),
        });
        metrics.observe(&Event::FileIsCached {
            record: record(errors),
        });
        metrics.observe(&Event::Log(LogEvent::new(
            "test",
            Severity::Info,
            "hi",
            Vec::new(),
        )));

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                files_cached: 1,
                files_analyzed: 1,
                recorded_errors: 4,
            }
        );

        let rendered = metrics.render()?;
        assert!(rendered.contains("quire_files_analyzed_total 1"));
        assert!(rendered.contains("quire_recorded_errors_total{severity=\"warning\"} 2"));
        assert!(rendered.contains("quire_events_published_total{kind=\"system.log\"} 1"));
        Ok(())
    }

    #[test]
    fn connect_observes_bus_traffic() -> Result<()> {
        let metrics = Metrics::new()?;
        let bus = EventBus::new();
        metrics.connect(&bus);

        bus.publish(Event::FileAnalyzed {
            record: record(Vec::new()),
        })?;

        assert_eq!(metrics.snapshot().files_analyzed, 1);
        Ok(())
    }

    #[test]
    fn write_to_creates_parent_directories() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("out/metrics.prom");
        Metrics::new()?.write_to(&path)?;

        let written = fs::read_to_string(&path)?;
        assert!(written.contains("quire_files_cached_total 0"));
        Ok(())
    }
}
