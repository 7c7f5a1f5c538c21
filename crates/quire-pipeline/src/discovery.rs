//! Source file discovery.
//!
//! Traversal order is made stable by sorting the collected paths, so cache
//! hit/miss reporting is reproducible between runs over the same tree.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{PipelineError, PipelineResult};

/// Filters applied while walking the source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// File extensions (without the dot) to include; compared case-insensitively.
    pub extensions: Vec<String>,
    /// Whether to descend into hidden files and directories.
    pub include_hidden: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["rs".to_string()],
            include_hidden: false,
        }
    }
}

impl DiscoveryOptions {
    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}

/// Collect source files under `root`, sorted by path.
///
/// When `root` is itself a file it is returned as long as its extension matches.
///
/// # Errors
///
/// Returns an error if `root` does not exist or the traversal fails.
pub fn discover_sources(root: &Path, options: &DiscoveryOptions) -> PipelineResult<Vec<PathBuf>> {
    if !root.exists() {
        return Err(PipelineError::RootMissing {
            path: root.to_path_buf(),
        });
    }

    let mut sources = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| options.include_hidden || entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|source| PipelineError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && options.matches_extension(entry.path()) {
            sources.push(entry.into_path());
        }
    }

    sources.sort();
    Ok(sources)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> Result<()> {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "fn main() {}\n")?;
        Ok(())
    }

    #[test]
    fn discovers_matching_files_in_sorted_order() -> Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "src/z.rs")?;
        touch(dir.path(), "src/a.rs")?;
        touch(dir.path(), "src/nested/m.RS")?;
        touch(dir.path(), "README.md")?;

        let found = discover_sources(dir.path(), &DiscoveryOptions::default())?;
        let relative: Vec<_> = found
            .iter()
            .map(|path| path.strip_prefix(dir.path()).map(Path::to_path_buf))
            .collect::<Result<_, _>>()?;
        assert_eq!(
            relative,
            vec![
                PathBuf::from("src/a.rs"),
                PathBuf::from("src/nested/m.RS"),
                PathBuf::from("src/z.rs"),
            ]
        );
        Ok(())
    }

    #[test]
    fn hidden_entries_are_skipped_unless_requested() -> Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), ".cache/skip.rs")?;
        touch(dir.path(), ".hidden.rs")?;
        touch(dir.path(), "keep.rs")?;

        let default = discover_sources(dir.path(), &DiscoveryOptions::default())?;
        assert_eq!(default, vec![dir.path().join("keep.rs")]);

        let options = DiscoveryOptions {
            include_hidden: true,
            ..DiscoveryOptions::default()
        };
        assert_eq!(discover_sources(dir.path(), &options)?.len(), 3);
        Ok(())
    }

    #[test]
    fn extensions_accept_leading_dot() -> Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "index.php")?;
        touch(dir.path(), "lib.rs")?;

        let options = DiscoveryOptions {
            extensions: vec![".php".to_string()],
            include_hidden: false,
        };
        assert_eq!(
            discover_sources(dir.path(), &options)?,
            vec![dir.path().join("index.php")]
        );
        Ok(())
    }

    #[test]
    fn missing_root_is_reported() {
        let err = discover_sources(Path::new("/definitely/not/here"), &DiscoveryOptions::default())
            .expect_err("missing root");
        assert!(matches!(err, PipelineError::RootMissing { .. }));
    }
}
