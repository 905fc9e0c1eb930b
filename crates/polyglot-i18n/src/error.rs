//! Error types for localization operations

use crate::Language;
use polyglot_common::PolyglotError;
use thiserror::Error;

/// Errors raised by a persisted language store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing document could not be encoded or decoded
    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during localization operations
#[derive(Error, Debug)]
pub enum I18nError {
    /// The language is not in the configured allow-list
    #[error("Unsupported language '{language}' (supported: {})", format_languages(.supported))]
    UnsupportedLanguage {
        language: Language,
        supported: Vec<Language>,
    },

    /// The language has no entry in the message catalog
    #[error("No messages defined for language '{language}'")]
    UnknownLanguage { language: Language },

    /// Persisting the selected language failed; the in-memory switch still happened
    #[error("Failed to persist language under key '{key}': {source}")]
    PersistenceWrite {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Reading the persisted language failed; treated as absent
    #[error("Failed to read persisted language under key '{key}': {source}")]
    PersistenceRead {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Two requested namespaces define the same key (strict resolution only)
    #[error("Key '{key}' is defined by more than one namespace: {}", .namespaces.join(", "))]
    KeyCollision { key: String, namespaces: Vec<String> },

    /// The localization options are inconsistent
    #[error("Invalid localization options: {0}")]
    InvalidOptions(String),
}

impl I18nError {
    /// Whether the error leaves the in-memory localization state intact
    pub fn is_non_fatal(&self) -> bool {
        matches!(self, Self::PersistenceWrite { .. } | Self::PersistenceRead { .. })
    }

    /// Language this error refers to, if any
    pub fn language(&self) -> Option<&Language> {
        match self {
            Self::UnsupportedLanguage { language, .. } | Self::UnknownLanguage { language } => {
                Some(language)
            }
            _ => None,
        }
    }
}

fn format_languages(languages: &[Language]) -> String {
    languages
        .iter()
        .map(Language::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<I18nError> for PolyglotError {
    fn from(err: I18nError) -> Self {
        let message = err.to_string();
        let language = err.language().map(|l| l.to_string());
        match err {
            I18nError::PersistenceWrite { source, .. }
            | I18nError::PersistenceRead { source, .. } => {
                PolyglotError::localization_with_source(message, language, source)
            }
            I18nError::InvalidOptions(_) => PolyglotError::config(message),
            _ => PolyglotError::localization(message, language),
        }
    }
}

/// Result type for localization operations
pub type I18nResult<T> = Result<T, I18nError>;
