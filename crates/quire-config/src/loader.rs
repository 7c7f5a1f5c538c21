//! Config file discovery and parsing.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::defaults::CONFIG_FILE_NAME;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{BuildConfig, ConfigOverrides};
use crate::validate::validate;

/// Reads a [`BuildConfig`] for a source root.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader that looks for [`CONFIG_FILE_NAME`] inside `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            file: None,
        }
    }

    /// Read `file` instead of the file in the root. The file must exist.
    #[must_use]
    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    /// Load the configuration without overrides or validation.
    ///
    /// A missing `quire.json` in the root yields the defaults; an explicit
    /// file that is missing is an error. A relative `cache_path` in the file
    /// is taken relative to the root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Json`] when it is not a valid document.
    pub fn load(&self) -> ConfigResult<BuildConfig> {
        let (path, required) = self.file.as_ref().map_or_else(
            || (self.root.join(CONFIG_FILE_NAME), false),
            |file| (file.clone(), true),
        );

        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => parse(&path, &contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound && !required => {
                debug!(path = %path.display(), "no config file; using defaults");
                BuildConfig::default()
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };
        config.source_root.clone_from(&self.root);
        if let Some(cache_path) = config.cache_path.as_mut().filter(|path| path.is_relative()) {
            *cache_path = self.root.join(&*cache_path);
        }
        Ok(config)
    }
}

fn parse(path: &Path, contents: &str) -> ConfigResult<BuildConfig> {
    let config = serde_json::from_str(contents).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Load, apply `overrides`, and validate the configuration for `root`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the merged
/// configuration fails validation.
pub fn load_config(
    root: &Path,
    file: Option<PathBuf>,
    overrides: ConfigOverrides,
) -> ConfigResult<BuildConfig> {
    let mut config = ConfigLoader::new(root).with_file(file).load()?;
    overrides.apply(&mut config);
    validate(&mut config)?;
    Ok(config)
}
