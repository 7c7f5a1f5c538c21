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

//! Cache-aware analysis pipeline.
//!
//! # Design
//! - Files are processed one at a time on the caller's thread.
//! - Each processed path yields exactly one lifecycle event: `file.is_cached`
//!   when the stored fingerprint matches, `file.analyzed` otherwise.
//! - Analysis failures never reach the cache; listener failures propagate.
//!
//! Layout: `analyzer.rs` (analyzer seam and the doc-comment linter),
//! `discovery.rs` (source traversal), `pipeline.rs` (cache-or-analyse
//! orchestration), `error.rs` (failure taxonomy).

pub mod analyzer;
pub mod discovery;
pub mod error;
pub mod pipeline;

pub use analyzer::{Analyzer, DocCommentAnalyzer};
pub use discovery::{DiscoveryOptions, discover_sources};
pub use error::{AnalysisError, PipelineError, PipelineResult};
pub use pipeline::{AnalysisPipeline, PipelineOptions, ProcessOutcome, RunSummary};
