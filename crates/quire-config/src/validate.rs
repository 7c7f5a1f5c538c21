//! Field checks run after file values and overrides are merged.

use std::collections::HashSet;

use crate::defaults::{LOG_FORMATS, LOG_LEVELS};
use crate::error::{ConfigError, ConfigResult};
use crate::model::BuildConfig;

/// Validate a merged configuration.
///
/// Extensions are normalised in place: a leading dot is stripped and the
/// value is lowercased.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for the first field that fails.
pub fn validate(config: &mut BuildConfig) -> ConfigResult<()> {
    if config.extensions.is_empty() {
        return Err(ConfigError::invalid(
            "extensions",
            None,
            "at least one extension is required",
        ));
    }
    for extension in &mut config.extensions {
        let normalised = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        if normalised.is_empty() || normalised.contains(['/', '\\']) {
            return Err(ConfigError::invalid(
                "extensions",
                Some(extension.as_str()),
                "extension must be a bare file suffix",
            ));
        }
        *extension = normalised;
    }
    let mut seen = HashSet::new();
    config.extensions.retain(|extension| seen.insert(extension.clone()));

    if !LOG_LEVELS.contains(&config.log_level.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::invalid(
            "log_level",
            Some(config.log_level.as_str()),
            "unknown log level",
        ));
    }
    if !LOG_FORMATS.contains(&config.log_format.to_ascii_lowercase().as_str()) {
        return Err(ConfigError::invalid(
            "log_format",
            Some(config.log_format.as_str()),
            "log format must be pretty or json",
        ));
    }
    if config
        .cache_path
        .as_ref()
        .is_some_and(|path| path.as_os_str().is_empty())
    {
        return Err(ConfigError::invalid("cache_path", Some(""), "cache path is empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(config: &mut BuildConfig) -> (&'static str, &'static str) {
        match validate(config) {
            Err(ConfigError::InvalidField { field, reason, .. }) => (field, reason),
            other => panic!("expected invalid field, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        let mut config = BuildConfig::default();
        assert!(validate(&mut config).is_ok());
    }

    #[test]
    fn extensions_are_normalised() {
        let mut config = BuildConfig {
            extensions: vec![".PHP".to_string(), "php".to_string(), " rs ".to_string()],
            ..BuildConfig::default()
        };
        validate(&mut config).expect("valid");
        assert_eq!(config.extensions, vec!["php", "rs"]);
    }

    #[test]
    fn empty_extensions_are_rejected() {
        let mut config = BuildConfig {
            extensions: Vec::new(),
            ..BuildConfig::default()
        };
        assert_eq!(reason(&mut config).0, "extensions");

        let mut config = BuildConfig {
            extensions: vec![".".to_string()],
            ..BuildConfig::default()
        };
        assert_eq!(reason(&mut config).1, "extension must be a bare file suffix");
    }

    #[test]
    fn log_settings_are_checked() {
        let mut config = BuildConfig {
            log_level: "loud".to_string(),
            ..BuildConfig::default()
        };
        assert_eq!(reason(&mut config).0, "log_level");

        let mut config = BuildConfig {
            log_format: "xml".to_string(),
            ..BuildConfig::default()
        };
        assert_eq!(reason(&mut config).0, "log_format");
    }
}
