//! Error types and utilities for Polyglot

use thiserror::Error;

/// Result type alias for Polyglot operations
pub type Result<T> = std::result::Result<T, PolyglotError>;

/// Top-level error type for Polyglot operations
///
/// Crate-specific errors (`I18nError`, `ConfigError`) convert into this type so
/// that applications embedding several crates can propagate a single error.
#[derive(Error, Debug)]
pub enum PolyglotError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Localization errors (language selection, catalog consistency, persistence)
    #[error("Localization error: {message}")]
    Localization {
        message: String,
        language: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PolyglotError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new localization error, optionally tied to a language
    pub fn localization(msg: impl Into<String>, language: Option<String>) -> Self {
        Self::Localization {
            message: msg.into(),
            language,
            source: None,
        }
    }

    /// Create a new localization error with source
    pub fn localization_with_source(
        msg: impl Into<String>,
        language: Option<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Localization {
            message: msg.into(),
            language,
            source: Some(Box::new(source)),
        }
    }

    /// Language attached to a localization error, if any
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Localization { language, .. } => language.as_deref(),
            Self::Config { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let config_error = PolyglotError::config("config issue");
        assert_eq!(config_error.to_string(), "Configuration error: config issue");
        assert!(config_error.source().is_none());
        assert_eq!(config_error.language(), None);

        let localization_error =
            PolyglotError::localization("Language not supported", Some("pl".to_string()));
        assert!(localization_error.to_string().contains("Localization error"));
        assert_eq!(localization_error.language(), Some("pl"));
    }

    #[test]
    fn test_error_with_source() {
        let config_source_error = PolyglotError::config_with_source(
            "Config loading failed",
            io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
        );

        assert_eq!(
            config_source_error.to_string(),
            "Configuration error: Config loading failed"
        );
        assert!(config_source_error.source().is_some());
    }

    #[test]
    fn test_error_chain_preservation() {
        let root_error = io::Error::new(io::ErrorKind::NotFound, "Root cause");
        let middle_error =
            PolyglotError::localization_with_source("Middle layer", None, root_error);
        let top_error = PolyglotError::config_with_source("Top layer", middle_error);

        let mut current_error: &dyn std::error::Error = &top_error;
        let mut depth = 0;
        while let Some(source) = current_error.source() {
            current_error = source;
            depth += 1;
        }

        assert_eq!(depth, 2);
    }
}
