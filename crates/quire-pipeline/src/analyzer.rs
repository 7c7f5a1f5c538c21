//! Analyzer seam and the default doc-comment linter.
//!
//! # Design
//! - The pipeline only depends on the `Analyzer` trait; the linter below is
//!   the stock implementation used by the CLI.
//! - Scanning is line-based and deterministic: declarations are matched with a
//!   regex and checked against the doc comment block directly above them.

use std::path::Path;

use quire_core::{ErrorRecord, Severity};
use regex::Regex;

use crate::error::AnalysisError;

/// Message recorded for a declaration without a doc comment.
pub const MISSING_SUMMARY: &str = "No summary for %s '%s'";
/// Message recorded for a doc comment that contains no text.
pub const EMPTY_SUMMARY: &str = "Empty summary for %s '%s'";
/// Message recorded for `TODO`/`FIXME` markers inside doc comments.
pub const PENDING_MARKER: &str = "Pending marker in documentation of '%s' on line %d";
/// Message recorded for files without declarations or file-level docs.
pub const NO_FILE_DOCS: &str = "No file-level documentation in %s";

const DECLARATION_PATTERN: &str = concat!(
    r#"^\s*(?:(?:pub(?:\([^)]*\))?|public|protected|private|abstract|final|static|async|unsafe|const|extern(?:\s+"[^"]*")?)\s+)*"#,
    r"(fn|struct|enum|trait|mod|const|type|class|interface|function)\s+&?([A-Za-z_][A-Za-z0-9_]*)",
);

/// Produces the recorded problems for one file.
pub trait Analyzer {
    /// Analyse `contents` read from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be analysed at all; recorded
    /// problems belong in the returned list instead.
    fn analyze(&self, path: &Path, contents: &[u8]) -> Result<Vec<ErrorRecord>, AnalysisError>;
}

impl<A: Analyzer + ?Sized> Analyzer for &A {
    fn analyze(&self, path: &Path, contents: &[u8]) -> Result<Vec<ErrorRecord>, AnalysisError> {
        (**self).analyze(path, contents)
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&self, path: &Path, contents: &[u8]) -> Result<Vec<ErrorRecord>, AnalysisError> {
        (**self).analyze(path, contents)
    }
}

/// Flags declarations whose doc comments are missing, empty, or unfinished.
#[derive(Debug, Clone)]
pub struct DocCommentAnalyzer {
    declaration: Regex,
}

struct DocLine {
    line: usize,
    text: String,
}

#[derive(Default)]
struct ScanState {
    pending: Option<Vec<DocLine>>,
    in_block: bool,
    attribute_depth: usize,
    file_docs: bool,
    declarations: usize,
}

impl ScanState {
    fn push_doc(&mut self, line: usize, text: &str) {
        self.pending.get_or_insert_with(Vec::new).push(DocLine {
            line,
            text: text.trim().to_string(),
        });
    }
}

impl DocCommentAnalyzer {
    /// Compile the declaration pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration regex fails to compile.
    pub fn new() -> Result<Self, AnalysisError> {
        let declaration =
            Regex::new(DECLARATION_PATTERN).map_err(|source| AnalysisError::Pattern {
                pattern: DECLARATION_PATTERN,
                source,
            })?;
        Ok(Self { declaration })
    }

    fn check_declaration(
        pending: Option<Vec<DocLine>>,
        kind: &str,
        name: &str,
        errors: &mut Vec<ErrorRecord>,
    ) {
        let Some(docs) = pending else {
            errors.push(ErrorRecord::new(Severity::Error, MISSING_SUMMARY, [kind, name]));
            return;
        };

        if docs.iter().all(|doc| doc.text.is_empty()) {
            errors.push(ErrorRecord::new(Severity::Warning, EMPTY_SUMMARY, [kind, name]));
        }

        for doc in docs
            .iter()
            .filter(|doc| doc.text.contains("TODO") || doc.text.contains("FIXME"))
        {
            errors.push(ErrorRecord::new(
                Severity::Notice,
                PENDING_MARKER,
                [name.to_string(), doc.line.to_string()],
            ));
        }
    }
}

impl Analyzer for DocCommentAnalyzer {
    fn analyze(&self, path: &Path, contents: &[u8]) -> Result<Vec<ErrorRecord>, AnalysisError> {
        let text = std::str::from_utf8(contents).map_err(|err| AnalysisError::NotUtf8 {
            valid_up_to: err.valid_up_to(),
        })?;

        let mut errors = Vec::new();
        let mut state = ScanState::default();

        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();

            if state.attribute_depth > 0 {
                state.attribute_depth = close_brackets(state.attribute_depth, line);
                continue;
            }

            if state.in_block {
                let (body, closed) = line
                    .split_once("*/")
                    .map_or((line, false), |(body, _)| (body, true));
                state.push_doc(line_no, body.trim_start_matches('*'));
                state.in_block = !closed;
                continue;
            }

            if let Some(rest) = line.strip_prefix("/**").filter(|rest| !rest.starts_with('/')) {
                let (body, closed) = rest
                    .split_once("*/")
                    .map_or((rest, false), |(body, _)| (body, true));
                state.push_doc(line_no, body);
                state.in_block = !closed;
                continue;
            }

            if let Some(rest) = line.strip_prefix("///").filter(|rest| !rest.starts_with('/')) {
                state.push_doc(line_no, rest);
                continue;
            }

            if line.starts_with("//!") {
                state.file_docs = true;
                continue;
            }

            if line.starts_with("#[") || line.starts_with("#![") {
                state.attribute_depth = close_brackets(0, line);
                continue;
            }

            if line.is_empty() {
                continue;
            }

            if let Some(caps) = self.declaration.captures(line) {
                state.declarations += 1;
                Self::check_declaration(state.pending.take(), &caps[1], &caps[2], &mut errors);
                continue;
            }

            state.pending = None;
        }

        if state.declarations == 0 && !state.file_docs {
            errors.push(ErrorRecord::new(
                Severity::Info,
                NO_FILE_DOCS,
                [path.display().to_string()],
            ));
        }

        Ok(errors)
    }
}

/// Bracket depth left open after `line`, starting from `depth`.
fn close_brackets(depth: usize, line: &str) -> usize {
    line.chars().fold(depth, |depth, ch| match ch {
        '[' => depth + 1,
        ']' => depth.saturating_sub(1),
        _ => depth,
    })
}
