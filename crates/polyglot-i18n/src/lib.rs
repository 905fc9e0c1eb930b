//! Namespaced message catalogs with reactive language switching
//!
//! This crate keeps the active language of an application, derives the
//! language-scoped translation tree from a static message catalog, and tells
//! subscribers when that tree changes. It includes:
//!
//! - Language selection validated against an allow-list and persisted through
//!   a pluggable [`LanguageStore`]
//! - Translation tree construction per language
//! - A named-event [`ChangeNotifier`] with handle-based unsubscription
//! - Resolution of namespaces into `{key}Message` / `{key}` entries, where the
//!   latter fills `{name}` placeholders
//! - A [`TranslationBinding`] that memoizes resolved tables across changes
//!
//! # Example
//!
//! ```rust
//! use polyglot_i18n::{
//!     message_args, Localization, LocalizationOptions, MemoryStore, MessageCatalog,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = LocalizationOptions {
//!     messages: MessageCatalog::new()
//!         .with_message("en", "common", "greeting", "Hello {name}")
//!         .with_message("es", "common", "greeting", "Hola {name}"),
//!     default_language: "en".into(),
//!     supported_languages: vec!["en".into(), "es".into()],
//!     language_storage_key: "app.language".to_string(),
//! };
//!
//! let localization = Localization::start(options, MemoryStore::new())?;
//! localization.set_language("es")?;
//!
//! let translations = localization.resolve(&["common"]);
//! let args = message_args!["name" => "Ana"];
//! assert_eq!(translations.format("greeting", args.as_ref()).as_deref(), Some("Hola Ana"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod binding;
pub mod catalog;
pub mod error;
pub mod locale;
pub mod manager;
pub mod notifier;
pub mod resolver;
pub mod store;
pub mod tree;

pub use binding::TranslationBinding;
pub use catalog::{
    LanguageCoverage, LanguageMessages, MessageCatalog, MessagePath, NamespaceMessages,
};
pub use error::{I18nError, I18nResult, StoreError};
pub use locale::Language;
pub use manager::{LanguageChange, Localization, LocalizationOptions};
pub use notifier::{
    ChangeNotifier, ListenerHandle, ListenerId, Subscription, TRANSLATION_TREE_CHANGE,
};
pub use resolver::{
    resolve, resolve_strict, Formatter, IntoArgValue, KeyCollision, MessageArgs, TranslationEntry,
    TranslationMap,
};
pub use store::{JsonFileStore, LanguageStore, MemoryStore};
pub use tree::{build as build_tree, TranslationTree};
