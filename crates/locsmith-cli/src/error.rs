//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Fixture could not be loaded
    #[error("Cannot load fixture {path}: {source}")]
    Fixture {
        /// Fixture path
        path: String,
        /// Underlying error
        #[source]
        source: locsmith::LocsmithError,
    },

    /// No element to operate on
    #[error("Target not found: {message}")]
    TargetNotFound {
        /// Error message
        message: String,
    },

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Locsmith library error
    #[error("Locsmith error: {0}")]
    Locsmith(#[from] locsmith::LocsmithError),

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a fixture error
    #[must_use]
    pub fn fixture(path: impl Into<String>, source: locsmith::LocsmithError) -> Self {
        Self::Fixture {
            path: path.into(),
            source,
        }
    }

    /// Create a target-not-found error
    #[must_use]
    pub fn target_not_found(message: impl Into<String>) -> Self {
        Self::TargetNotFound {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CliError::config("bad config");
        assert!(err.to_string().contains("Configuration"));
        assert!(err.to_string().contains("bad config"));
    }

    #[test]
    fn test_fixture_error_names_path() {
        let err = CliError::fixture("page.json", locsmith::LocsmithError::fixture("no root"));
        let message = err.to_string();
        assert!(message.contains("page.json"));
        assert!(message.contains("no root"));
    }

    #[test]
    fn test_target_not_found_error() {
        let err = CliError::target_not_found("no element matches 'button'");
        assert!(err.to_string().contains("Target not found"));
    }

    #[test]
    fn test_invalid_argument_error() {
        let err = CliError::invalid_argument("bad arg");
        assert!(err.to_string().contains("Invalid argument"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let cli_err: CliError = io_err.into();
        assert!(cli_err.to_string().contains("I/O"));
    }

    #[test]
    fn test_library_error_from() {
        let err: CliError = locsmith::LocsmithError::config("empty list").into();
        assert!(err.to_string().contains("Locsmith"));
    }
}
