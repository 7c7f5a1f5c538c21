//! Scripted analyzer and event recorder.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use quire_core::{ErrorRecord, LogEvent};
use quire_events::{Event, EventBus, EventEnvelope, EventKind};
use quire_pipeline::{AnalysisError, Analyzer};

/// Analyzer returning canned errors per path suffix and counting calls.
#[derive(Default)]
pub struct ScriptedAnalyzer {
    errors: BTreeMap<PathBuf, Vec<ErrorRecord>>,
    failing: Vec<PathBuf>,
    calls: AtomicUsize,
}

impl ScriptedAnalyzer {
    /// Analyzer that records nothing for every file.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `errors` for any path ending in `suffix`.
    #[must_use]
    pub fn with_errors(mut self, suffix: &str, errors: Vec<ErrorRecord>) -> Self {
        self.errors.insert(PathBuf::from(suffix), errors);
        self
    }

    /// Fail analysis for any path ending in `suffix`.
    #[must_use]
    pub fn failing_on(mut self, suffix: &str) -> Self {
        self.failing.push(PathBuf::from(suffix));
        self
    }

    /// Number of times `analyze` ran.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Analyzer for ScriptedAnalyzer {
    fn analyze(&self, path: &Path, _contents: &[u8]) -> Result<Vec<ErrorRecord>, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|suffix| path.ends_with(suffix)) {
            return Err(AnalysisError::failed(format!(
                "scripted failure for {}",
                path.display()
            )));
        }
        Ok(self
            .errors
            .iter()
            .find(|(suffix, _)| path.ends_with(suffix))
            .map(|(_, errors)| errors.clone())
            .unwrap_or_default())
    }
}

/// Records every event published on a bus, in dispatch order.
#[derive(Clone)]
pub struct EventRecorder {
    seen: Arc<Mutex<Vec<EventEnvelope>>>,
}

impl EventRecorder {
    /// Subscribe a recorder to every event kind on `bus`.
    #[must_use]
    pub fn attach(bus: &EventBus) -> Self {
        let recorder = Self {
            seen: Arc::new(Mutex::new(Vec::new())),
        };
        for kind in EventKind::ALL {
            let seen = Arc::clone(&recorder.seen);
            bus.subscribe(kind, move |_, envelope| {
                seen.lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .push(envelope.clone());
                Ok(())
            });
        }
        recorder
    }

    /// Recorded envelopes.
    #[must_use]
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.lock().clone()
    }

    /// Kinds of the recorded events.
    #[must_use]
    pub fn kinds(&self) -> Vec<EventKind> {
        self.lock().iter().map(|envelope| envelope.event.kind()).collect()
    }

    /// Kinds of the lifecycle (non-log) events only.
    #[must_use]
    pub fn lifecycle_kinds(&self) -> Vec<EventKind> {
        self.kinds()
            .into_iter()
            .filter(|kind| *kind != EventKind::Log)
            .collect()
    }

    /// Recorded log events.
    #[must_use]
    pub fn log_events(&self) -> Vec<LogEvent> {
        self.lock()
            .iter()
            .filter_map(|envelope| match &envelope.event {
                Event::Log(log) => Some(log.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EventEnvelope>> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
