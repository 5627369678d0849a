//! Result and error types for Locsmith.
//!
//! Synthesis, description and formatting never fail: they degrade to
//! `None`, an empty string or a fallback snippet. Errors only surface at
//! the edges (selector parsing, configuration, fixtures, delivery to
//! collaborators).

use thiserror::Error;

/// Result type for Locsmith operations
pub type LocsmithResult<T> = Result<T, LocsmithError>;

/// Errors that can occur in Locsmith
#[derive(Debug, Error)]
pub enum LocsmithError {
    /// Selector text could not be parsed by the selector engine
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        /// Selector text
        selector: String,
        /// Error message
        message: String,
    },

    /// Dialect identifier not recognized
    #[error("Unknown dialect: {name}")]
    UnknownDialect {
        /// Identifier that failed to parse
        name: String,
    },

    /// Export format identifier not recognized
    #[error("Unknown export format: {name}")]
    UnknownFormat {
        /// Identifier that failed to parse
        name: String,
    },

    /// A collaborator (observer, clipboard) refused or dropped a message
    #[error("Delivery to {channel} failed: {message}")]
    Delivery {
        /// Channel name
        channel: String,
        /// Error message
        message: String,
    },

    /// Invalid engine configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// DOM fixture could not be built
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl LocsmithError {
    /// Create an invalid selector error
    #[must_use]
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Create a delivery error
    #[must_use]
    pub fn delivery(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a fixture error
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_selector_display() {
        let err = LocsmithError::invalid_selector("div >", "dangling combinator");
        assert_eq!(
            err.to_string(),
            "Invalid selector 'div >': dangling combinator"
        );
    }

    #[test]
    fn test_delivery_display() {
        let err = LocsmithError::delivery("clipboard", "permission denied");
        assert!(err.to_string().contains("clipboard"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LocsmithError = io.into();
        assert!(matches!(err, LocsmithError::Io(_)));
    }
}
