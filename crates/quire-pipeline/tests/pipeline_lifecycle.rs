//! Cache lifecycle scenarios driven through the public pipeline API.

use anyhow::Result;
use quire_cache::{FileCache, MemoryFileCache};
use quire_core::{ErrorRecord, Severity};
use quire_events::{EventBus, EventKind};
use quire_pipeline::{AnalysisPipeline, PipelineError, PipelineOptions};
use quire_test_support::fixtures::SourceTree;
use quire_test_support::mocks::{EventRecorder, ScriptedAnalyzer};

fn warning(code: &str) -> ErrorRecord {
    ErrorRecord::new(Severity::Warning, code, Vec::<String>::new())
}

#[test]
fn first_run_analyses_and_stores() -> Result<()> {
    let tree = SourceTree::new()?;
    let path = tree.write("A.src", "one")?;
    let bus = EventBus::new();
    let recorder = EventRecorder::attach(&bus);
    let analyzer = ScriptedAnalyzer::new().with_errors("A.src", vec![warning("W1")]);

    let mut pipeline = AnalysisPipeline::new(MemoryFileCache::new(), &analyzer, bus);
    let record = pipeline.process_file(&path)?;

    assert_eq!(record.errors, vec![warning("W1")]);
    assert_eq!(recorder.kinds(), vec![EventKind::FileAnalyzed]);
    assert_eq!(pipeline.cache().lookup(&path), Some(record));
    assert_eq!(analyzer.calls(), 1);
    Ok(())
}

#[test]
fn unchanged_file_is_served_from_cache() -> Result<()> {
    let tree = SourceTree::new()?;
    let path = tree.write("A.src", "one")?;
    let bus = EventBus::new();
    let recorder = EventRecorder::attach(&bus);
    let analyzer = ScriptedAnalyzer::new().with_errors("A.src", vec![warning("W1")]);
    let mut pipeline = AnalysisPipeline::new(MemoryFileCache::new(), &analyzer, bus);

    let first = pipeline.process_file(&path)?;
    recorder.clear();
    let second = pipeline.process_file(&path)?;

    assert_eq!(first, second);
    assert_eq!(recorder.kinds(), vec![EventKind::FileIsCached]);
    assert_eq!(analyzer.calls(), 1);
    Ok(())
}

#[test]
fn changed_file_is_reanalysed_and_overwritten() -> Result<()> {
    let tree = SourceTree::new()?;
    let path = tree.write("A.src", "one")?;
    let bus = EventBus::new();
    let recorder = EventRecorder::attach(&bus);
    let analyzer = ScriptedAnalyzer::new().with_errors("A.src", vec![warning("W1")]);
    let mut pipeline = AnalysisPipeline::new(MemoryFileCache::new(), &analyzer, bus);

    let first = pipeline.process_file(&path)?;
    tree.write("A.src", "two")?;
    recorder.clear();
    let second = pipeline.process_file(&path)?;

    assert_ne!(first.fingerprint, second.fingerprint);
    assert_eq!(recorder.kinds(), vec![EventKind::FileAnalyzed]);
    assert_eq!(
        pipeline.cache().lookup(&path).map(|record| record.fingerprint),
        Some(second.fingerprint)
    );
    Ok(())
}

#[test]
fn analysis_failure_leaves_cache_untouched() -> Result<()> {
    let tree = SourceTree::new()?;
    let path = tree.write("broken.src", "???")?;
    let bus = EventBus::new();
    let recorder = EventRecorder::attach(&bus);
    let analyzer = ScriptedAnalyzer::new().failing_on("broken.src");
    let mut pipeline = AnalysisPipeline::new(MemoryFileCache::new(), &analyzer, bus);

    let err = pipeline.process_file(&path).expect_err("analysis fails");
    assert!(matches!(err, PipelineError::Analysis { .. }));
    assert!(pipeline.cache().is_empty());
    assert!(recorder.kinds().is_empty());
    Ok(())
}

#[test]
fn listener_failure_propagates() -> Result<()> {
    let tree = SourceTree::new()?;
    let path = tree.write("A.src", "one")?;
    let bus = EventBus::new();
    bus.subscribe(EventKind::FileAnalyzed, |_, _| Err("listener broke".into()));
    let mut pipeline =
        AnalysisPipeline::new(MemoryFileCache::new(), ScriptedAnalyzer::new(), bus);

    let err = pipeline.process_file(&path).expect_err("listener fails");
    assert!(matches!(err, PipelineError::Listener { .. }));
    Ok(())
}

#[test]
fn force_bypasses_cache() -> Result<()> {
    let tree = SourceTree::new()?;
    let path = tree.write("A.src", "one")?;
    let bus = EventBus::new();
    let recorder = EventRecorder::attach(&bus);
    let analyzer = ScriptedAnalyzer::new();
    let mut pipeline = AnalysisPipeline::new(MemoryFileCache::new(), &analyzer, bus)
        .with_options(PipelineOptions {
            force: true,
            fail_fast: true,
        });

    pipeline.process_file(&path)?;
    pipeline.process_file(&path)?;

    assert_eq!(
        recorder.kinds(),
        vec![EventKind::FileAnalyzed, EventKind::FileAnalyzed]
    );
    assert_eq!(analyzer.calls(), 2);
    Ok(())
}

#[test]
fn run_aborts_on_first_failure_by_default() -> Result<()> {
    let tree = SourceTree::new()?;
    let good = tree.write("a.src", "a")?;
    let bad = tree.write("b.src", "b")?;
    let never = tree.write("c.src", "c")?;
    let analyzer = ScriptedAnalyzer::new().failing_on("b.src");
    let mut pipeline = AnalysisPipeline::new(MemoryFileCache::new(), &analyzer, EventBus::new());

    let err = pipeline.run([&good, &bad, &never]).expect_err("run aborts");
    assert_eq!(err.path(), bad.as_path());
    assert_eq!(analyzer.calls(), 2);
    Ok(())
}

#[test]
fn run_keeps_going_when_asked() -> Result<()> {
    let tree = SourceTree::new()?;
    let good = tree.write("a.src", "a")?;
    let bad = tree.write("b.src", "b")?;
    let last = tree.write("c.src", "c")?;
    let analyzer = ScriptedAnalyzer::new()
        .failing_on("b.src")
        .with_errors("c.src", vec![warning("W1"), warning("W2")]);
    let mut pipeline = AnalysisPipeline::new(MemoryFileCache::new(), &analyzer, EventBus::new())
        .with_options(PipelineOptions {
            force: false,
            fail_fast: false,
        });

    let first = pipeline.run([&good, &bad, &last])?;
    assert_eq!(first.analyzed, 2);
    assert_eq!(first.recorded_errors, 2);
    assert_eq!(first.failures.len(), 1);
    assert!(!first.is_clean());

    let second = pipeline.run([&good, &last])?;
    assert_eq!(second.cached, 2);
    assert_eq!(second.processed(), 2);
    assert_eq!(second.recorded_errors, 2);
    assert!(second.is_clean());
    Ok(())
}
