//! # Polyglot Config
//!
//! Configuration loading and validation for the localization subsystem.
//!
//! A configuration file carries the message catalog, the language allow-list,
//! the default language, and the storage key for the persisted preference,
//! plus the logging setup. YAML, TOML, and JSON files are accepted.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigFormat, ConfigLoader};
pub use settings::{Config, LocalizationConfig};
