//! Configuration loading utilities

use crate::Config;
use polyglot_common::Result as PolyglotResult;
use polyglot_i18n::Language;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "POLYGLOT_CONFIG_PATH";

/// Files probed in the working directory when no path is given
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["polyglot.yaml", "polyglot.yml", "polyglot.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParse {
        /// Name of the offending variable
        var: String,
        /// Underlying parse failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// File extension not mapped to a format
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),
}

impl From<ConfigError> for polyglot_common::PolyglotError {
    fn from(err: ConfigError) -> Self {
        polyglot_common::PolyglotError::config_with_source("Failed to load configuration", err)
    }
}

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    fn parse(self, content: &str) -> Result<Config, ConfigError> {
        let config = match self {
            Self::Yaml => serde_yaml::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
            Self::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }
}

/// Configuration loader for the localization subsystem
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;

        let content = std::fs::read_to_string(path)?;
        let mut config = format.parse(&content)?;
        debug!(path = %path.display(), ?format, "Parsed configuration file");

        Self::apply_env_overrides(&mut config)?;

        config.validate_all()?;

        info!(
            path = %path.display(),
            default_language = %config.localization.default_language,
            supported = config.localization.supported_languages.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from the path in `POLYGLOT_CONFIG_PATH`, or from the
    /// first default file present in the working directory
    pub fn load() -> PolyglotResult<Config> {
        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            return Ok(Self::load_config(config_path)?);
        }

        for candidate in DEFAULT_CONFIG_FILES {
            if Path::new(candidate).exists() {
                return Ok(Self::load_config(candidate)?);
            }
        }

        Err(ConfigError::MissingConfig(format!(
            "no configuration file found; set {} or create one of {}",
            CONFIG_PATH_VAR,
            DEFAULT_CONFIG_FILES.join(", ")
        ))
        .into())
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> PolyglotResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Parse and validate configuration text. Environment overrides are not
    /// applied.
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
        let config = format.parse(content)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Apply `POLYGLOT_*` environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_from(config, |name| env::var(name).ok())
    }

    /// Apply overrides read through `lookup` instead of the process environment
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Localization overrides
        if let Some(language) = lookup("POLYGLOT_DEFAULT_LANGUAGE") {
            config.localization.default_language = Language::new(language.trim());
        }

        if let Some(languages) = lookup("POLYGLOT_SUPPORTED_LANGUAGES") {
            config.localization.supported_languages = languages
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Language::from)
                .collect();
        }

        if let Some(key) = lookup("POLYGLOT_LANGUAGE_STORAGE_KEY") {
            config.localization.language_storage_key = key;
        }

        // Logging overrides
        if let Some(level) = lookup("POLYGLOT_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(json) = lookup("POLYGLOT_LOG_JSON") {
            config.logging.json_format =
                json.trim().parse().map_err(|e| ConfigError::EnvParse {
                    var: "POLYGLOT_LOG_JSON".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(path) = lookup("POLYGLOT_LOG_FILE") {
            config.logging.file_path = Some(path).filter(|p| !p.is_empty());
        }

        Ok(())
    }
}
