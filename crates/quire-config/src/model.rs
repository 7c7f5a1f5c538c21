//! Typed build configuration and command-line overrides.
//!
//! # Design
//! - Every field has a default, so a partial or missing file is valid.
//! - The source root always comes from the caller, never from the file.
//! - Overrides are applied after the file so flags and env win.

use std::path::{Path, PathBuf};

use quire_core::Verbosity;
use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_CACHE_FILE, DEFAULT_EXTENSION, DEFAULT_LOG_FORMAT, DEFAULT_LOG_LEVEL,
};

/// Settings for one documentation build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct BuildConfig {
    /// Directory scanned for sources.
    #[serde(skip)]
    pub source_root: PathBuf,
    /// Explicit cache file; defaults to [`DEFAULT_CACHE_FILE`] under the root.
    pub cache_path: Option<PathBuf>,
    /// File extensions to analyse.
    pub extensions: Vec<String>,
    /// Whether hidden files and directories are scanned.
    pub include_hidden: bool,
    /// Abort on the first failed file.
    pub fail_fast: bool,
    /// Re-analyse every file regardless of the cache.
    pub force: bool,
    /// Console verbosity.
    pub verbosity: Verbosity,
    /// `tracing` level used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Diagnostic log format (`pretty` or `json`).
    pub log_format: String,
    /// Where to write Prometheus metrics after a run.
    pub metrics_path: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("."),
            cache_path: None,
            extensions: vec![DEFAULT_EXTENSION.to_string()],
            include_hidden: false,
            fail_fast: true,
            force: false,
            verbosity: Verbosity::Normal,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: DEFAULT_LOG_FORMAT.to_string(),
            metrics_path: None,
        }
    }
}

impl BuildConfig {
    /// Defaults rooted at `source_root`.
    #[must_use]
    pub fn for_root(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            ..Self::default()
        }
    }

    /// Cache file actually used for the build.
    #[must_use]
    pub fn effective_cache_path(&self) -> PathBuf {
        self.cache_path
            .clone()
            .unwrap_or_else(|| self.source_root.join(DEFAULT_CACHE_FILE))
    }

    /// Source root as configured.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replacement cache file.
    pub cache_path: Option<PathBuf>,
    /// Replacement extension list; ignored when empty.
    pub extensions: Vec<String>,
    /// Force hidden-entry scanning on.
    pub include_hidden: bool,
    /// Force keep-going mode on.
    pub keep_going: bool,
    /// Force re-analysis on.
    pub force: bool,
    /// Force debug verbosity on.
    pub debug: bool,
    /// Replacement `tracing` level.
    pub log_level: Option<String>,
    /// Replacement log format.
    pub log_format: Option<String>,
    /// Replacement metrics output path.
    pub metrics_path: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Layer the overrides onto `config`.
    pub fn apply(self, config: &mut BuildConfig) {
        if let Some(path) = self.cache_path {
            config.cache_path = Some(path);
        }
        if !self.extensions.is_empty() {
            config.extensions = self.extensions;
        }
        config.include_hidden |= self.include_hidden;
        config.fail_fast &= !self.keep_going;
        config.force |= self.force;
        if self.debug {
            config.verbosity = Verbosity::Debug;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(path) = self.metrics_path {
            config.metrics_path = Some(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = BuildConfig::for_root("docs");
        assert_eq!(config.extensions, vec!["rs"]);
        assert!(config.fail_fast);
        assert!(!config.force);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert_eq!(config.log_level, "warn");
        assert_eq!(
            config.effective_cache_path(),
            Path::new("docs").join(".quire/cache.json")
        );
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let config: BuildConfig =
            serde_json::from_str(r#"{ "extensions": ["php"], "verbosity": "debug" }"#)
                .expect("valid document");
        assert_eq!(config.extensions, vec!["php"]);
        assert_eq!(config.verbosity, Verbosity::Debug);
        assert!(config.fail_fast);
        assert!(config.metrics_path.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<BuildConfig>(r#"{ "extension": "rs" }"#);
        assert!(result.is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let mut config = BuildConfig {
            cache_path: Some(PathBuf::from("file-cache.json")),
            extensions: vec!["php".to_string()],
            ..BuildConfig::for_root("src")
        };
        ConfigOverrides {
            cache_path: Some(PathBuf::from("cli-cache.json")),
            keep_going: true,
            debug: true,
            log_format: Some("json".to_string()),
            ..ConfigOverrides::default()
        }
        .apply(&mut config);

        assert_eq!(config.effective_cache_path(), PathBuf::from("cli-cache.json"));
        assert_eq!(config.extensions, vec!["php"]);
        assert!(!config.fail_fast);
        assert_eq!(config.verbosity, Verbosity::Debug);
        assert_eq!(config.log_format, "json");
        assert_eq!(config.log_level, "warn");
    }
}
