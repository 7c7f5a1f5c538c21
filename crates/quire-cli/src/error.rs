//! CLI error type and exit codes.

use quire_config::ConfigError;

/// Exit code for invalid arguments or configuration.
pub(crate) const EXIT_VALIDATION: i32 = 2;
/// Exit code for a build or cache operation that failed.
pub(crate) const EXIT_FAILURE: i32 = 3;

#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => EXIT_VALIDATION,
            Self::Failure(_) => EXIT_FAILURE,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let message = match &err {
            ConfigError::InvalidField {
                field,
                value: Some(value),
                reason,
            } => format!("invalid {field} '{value}': {reason}"),
            ConfigError::InvalidField {
                field,
                value: None,
                reason,
            } => format!("invalid {field}: {reason}"),
            ConfigError::Io { path, source } => format!("{err} {}: {source}", path.display()),
            ConfigError::Json { path, source } => format!("{err} {}: {source}", path.display()),
        };
        Self::Validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(CliError::validation("bad flag").exit_code(), 2);
        assert_eq!(
            CliError::failure(anyhow::anyhow!("disk full")).exit_code(),
            3
        );
    }

    #[test]
    fn failure_message_includes_context_chain() {
        let err = CliError::failure(
            anyhow::anyhow!("permission denied").context("failed to flush cache"),
        );
        assert_eq!(
            err.display_message(),
            "failed to flush cache: permission denied"
        );
    }

    #[test]
    fn config_errors_are_validation_errors() {
        let err = CliError::from(ConfigError::InvalidField {
            field: "extensions",
            value: None,
            reason: "at least one extension is required",
        });
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.display_message(),
            "invalid extensions: at least one extension is required"
        );

        let err = CliError::from(ConfigError::Io {
            path: PathBuf::from("quire.json"),
            source: std::io::Error::other("denied"),
        });
        assert_eq!(
            err.display_message(),
            "failed to read configuration file quire.json: denied"
        );
    }
}
