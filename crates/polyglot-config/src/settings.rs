//! Configuration structures

use polyglot_common::LoggingConfig;
use polyglot_i18n::{Language, LocalizationOptions, MessageCatalog};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;
use validator::{Validate, ValidationError, ValidationErrors};

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Catalog and language selection settings
    #[validate(nested)]
    pub localization: LocalizationConfig,

    /// Logging setup
    pub logging: LoggingConfig,
}

/// Localization settings
///
/// Field names are accepted in `snake_case` and in camelCase
/// (`defaultLanguage`, `supportedLanguages`, `languageStorageKey`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Language used when nothing valid is persisted
    #[serde(alias = "defaultLanguage")]
    #[validate(custom(
        function = "crate::validation::validate_language",
        message = "Invalid default language"
    ))]
    pub default_language: Language,

    /// Allow-list of selectable languages
    #[serde(alias = "supportedLanguages")]
    #[validate(length(min = 1, message = "At least one supported language is required"))]
    #[validate(custom(function = "crate::validation::validate_language_list"))]
    pub supported_languages: Vec<Language>,

    /// Key under which the chosen language is persisted
    #[serde(alias = "languageStorageKey")]
    #[validate(length(min = 1, message = "Language storage key cannot be empty"))]
    #[validate(custom(
        function = "crate::validation::validate_storage_key",
        message = "Invalid language storage key"
    ))]
    pub language_storage_key: String,

    /// language -> namespace -> key -> template
    pub messages: MessageCatalog,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_language: Language::from("en"),
            supported_languages: vec![Language::from("en")],
            language_storage_key: "language".to_string(),
            messages: MessageCatalog::new(),
        }
    }
}

impl Config {
    /// Full validation: field rules plus cross-field consistency
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        self.localization.validate_consistency()?;
        Ok(())
    }
}

impl LocalizationConfig {
    /// Checks that span several fields.
    ///
    /// The default language must be in the allow-list, and every allowed
    /// language needs an entry in the catalog.
    pub fn validate_consistency(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.supported_languages.contains(&self.default_language) {
            let mut err = ValidationError::new("default_language_not_supported");
            err.message = Some(Cow::Owned(format!(
                "default language '{}' is not in the supported languages",
                self.default_language
            )));
            err.add_param(Cow::Borrowed("language"), &self.default_language.as_str());
            errors.add("default_language", err);
        }

        for language in &self.supported_languages {
            if !self.messages.contains_language(language.as_str()) {
                let mut err = ValidationError::new("language_without_messages");
                err.message = Some(Cow::Owned(format!(
                    "supported language '{}' has no messages",
                    language
                )));
                err.add_param(Cow::Borrowed("language"), &language.as_str());
                errors.add("messages", err);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let unused = self
            .messages
            .languages()
            .filter(|language| !self.supported_languages.contains(language))
            .count();
        if unused > 0 {
            debug!(unused, "Catalog contains languages outside the allow-list");
        }

        Ok(())
    }

    /// Convert into the options consumed by `Localization`
    pub fn into_options(self) -> LocalizationOptions {
        LocalizationOptions {
            messages: self.messages,
            default_language: self.default_language,
            supported_languages: self.supported_languages,
            language_storage_key: self.language_storage_key,
        }
    }
}

impl From<LocalizationConfig> for LocalizationOptions {
    fn from(config: LocalizationConfig) -> Self {
        config.into_options()
    }
}
