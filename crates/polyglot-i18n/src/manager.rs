//! Localization state: the active language, its translation tree, and change
//! notification

use crate::catalog::MessageCatalog;
use crate::error::{I18nError, I18nResult};
use crate::notifier::{ChangeNotifier, ListenerHandle, Subscription, TRANSLATION_TREE_CHANGE};
use crate::resolver::{self, TranslationMap};
use crate::store::LanguageStore;
use crate::tree::{self, TranslationTree};
use crate::Language;
use parking_lot::{ReentrantMutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything a [`Localization`] needs at construction; all fields are required
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizationOptions {
    pub messages: MessageCatalog,
    #[serde(alias = "defaultLanguage")]
    pub default_language: Language,
    #[serde(alias = "supportedLanguages")]
    pub supported_languages: Vec<Language>,
    #[serde(alias = "languageStorageKey")]
    pub language_storage_key: String,
}

/// Outcome of a successful [`Localization::set_language`] call
#[derive(Debug)]
pub struct LanguageChange {
    /// Language before the call; `None` if no language had been resolved yet
    pub previous: Option<Language>,
    pub current: Language,
    /// Set when the store rejected the write; the switch happened regardless
    pub persistence_error: Option<I18nError>,
}

impl LanguageChange {
    /// Whether the language actually differs from the previous one
    pub fn changed(&self) -> bool {
        self.previous.as_ref() != Some(&self.current)
    }

    pub fn is_persisted(&self) -> bool {
        self.persistence_error.is_none()
    }
}

#[derive(Debug, Default)]
struct State {
    language: Option<Language>,
    tree: Arc<TranslationTree>,
}

/// Authoritative source of the active language.
///
/// Construct once per catalog and share it (typically behind an `Arc`) with
/// every consumer. Consumers read [`translations`](Self::translations) and
/// subscribe to [`TRANSLATION_TREE_CHANGE`] to learn when to read again.
pub struct Localization {
    messages: MessageCatalog,
    default_language: Language,
    supported_languages: Vec<Language>,
    storage_key: String,
    store: Box<dyn LanguageStore>,
    state: RwLock<State>,
    notifier: Arc<ChangeNotifier>,
    // Held for a whole language change, emission included; reentrant for listeners
    change_lock: ReentrantMutex<()>,
}

impl fmt::Debug for Localization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localization")
            .field("default_language", &self.default_language)
            .field("supported_languages", &self.supported_languages)
            .field("storage_key", &self.storage_key)
            .field("language", &self.state.read().language)
            .field("notifier", &self.notifier)
            .finish_non_exhaustive()
    }
}

impl Localization {
    /// Create the localization state without choosing a language yet.
    ///
    /// Fails when the options are inconsistent: an empty allow-list or storage
    /// key, a default language outside the allow-list, or a supported language
    /// without catalog entry.
    pub fn new<S>(options: LocalizationOptions, store: S) -> I18nResult<Self>
    where
        S: LanguageStore + 'static,
    {
        let LocalizationOptions {
            messages,
            default_language,
            supported_languages,
            language_storage_key,
        } = options;

        if supported_languages.is_empty() {
            return Err(I18nError::InvalidOptions(
                "supported languages must not be empty".to_string(),
            ));
        }
        if language_storage_key.trim().is_empty() {
            return Err(I18nError::InvalidOptions(
                "language storage key must not be empty".to_string(),
            ));
        }
        if !supported_languages.contains(&default_language) {
            return Err(I18nError::UnsupportedLanguage {
                language: default_language,
                supported: supported_languages,
            });
        }
        if let Some(language) = supported_languages
            .iter()
            .find(|language| !messages.contains_language(language.as_str()))
        {
            return Err(I18nError::UnknownLanguage {
                language: language.clone(),
            });
        }

        Self::report_coverage(&messages, &default_language, &supported_languages);

        info!(
            default_language = %default_language,
            supported = supported_languages.len(),
            storage_key = %language_storage_key,
            "Localization initialized"
        );

        Ok(Self {
            messages,
            default_language,
            supported_languages,
            storage_key: language_storage_key,
            store: Box::new(store),
            state: RwLock::new(State::default()),
            notifier: Arc::new(ChangeNotifier::new()),
            change_lock: ReentrantMutex::new(()),
        })
    }

    /// Create the state and immediately resolve the initial language
    pub fn start<S>(options: LocalizationOptions, store: S) -> I18nResult<Self>
    where
        S: LanguageStore + 'static,
    {
        let localization = Self::new(options, store)?;
        localization.resolve_initial_language()?;
        Ok(localization)
    }

    fn report_coverage(messages: &MessageCatalog, reference: &Language, supported: &[Language]) {
        let Some(report) = messages.coverage(reference.as_str()) else {
            return;
        };
        for coverage in report
            .iter()
            .filter(|c| supported.contains(&c.language) && !c.is_complete())
        {
            warn!(
                language = %coverage.language,
                reference = %reference,
                missing = coverage.missing.len(),
                extra = coverage.extra.len(),
                "Language does not define the same messages as the default language"
            );
        }
    }

    /// Pick the first language: the persisted one when it is supported,
    /// otherwise the default. Does not notify listeners.
    pub fn resolve_initial_language(&self) -> I18nResult<Language> {
        let _change = self.change_lock.lock();

        let stored = match self.store.get(&self.storage_key) {
            Ok(stored) => stored,
            Err(source) => {
                let err = I18nError::PersistenceRead {
                    key: self.storage_key.clone(),
                    source,
                };
                warn!("{}; using default language", err);
                None
            }
        };

        let language = match stored.map(Language::from) {
            Some(language) if self.is_supported(&language) => language,
            Some(language) => {
                warn!(
                    stored = %language,
                    default = %self.default_language,
                    "Persisted language is not supported; using default language"
                );
                self.default_language.clone()
            }
            None => self.default_language.clone(),
        };

        let tree = tree::build(&self.messages, &language)?;
        {
            let mut state = self.state.write();
            state.language = Some(language.clone());
            state.tree = Arc::new(tree);
        }

        info!(language = %language, "Resolved initial language");
        Ok(language)
    }

    /// Switch to `language`, persist it, rebuild the tree, and notify listeners.
    ///
    /// An unsupported language is rejected without any state change. A store
    /// failure does not undo the switch; it is returned in
    /// [`LanguageChange::persistence_error`]. Every successful call notifies
    /// exactly once, even when the language stays the same.
    ///
    /// A listener may call `set_language` again; that nested change runs and
    /// notifies to completion before the remaining listeners of the outer
    /// emission are called, so those see the nested notification first.
    pub fn set_language(&self, language: impl Into<Language>) -> I18nResult<LanguageChange> {
        let language = language.into();
        let _change = self.change_lock.lock();

        if !self.is_supported(&language) {
            warn!(language = %language, "Rejected unsupported language");
            return Err(I18nError::UnsupportedLanguage {
                language,
                supported: self.supported_languages.clone(),
            });
        }

        // A catalog defect must leave both state and store untouched
        let tree = tree::build(&self.messages, &language)?;

        let persistence_error = match self.store.set(&self.storage_key, language.as_str()) {
            Ok(()) => None,
            Err(source) => {
                let err = I18nError::PersistenceWrite {
                    key: self.storage_key.clone(),
                    source,
                };
                warn!("{}", err);
                Some(err)
            }
        };

        let previous = {
            let mut state = self.state.write();
            state.tree = Arc::new(tree);
            state.language.replace(language.clone())
        };

        info!(
            from = ?previous.as_ref().map(Language::as_str),
            to = %language,
            "Language changed"
        );

        let notified = self.notifier.emit(TRANSLATION_TREE_CHANGE);
        debug!(listeners = notified, "Notified translation tree listeners");

        Ok(LanguageChange {
            previous,
            current: language,
            persistence_error,
        })
    }

    /// Active language; `None` until the initial language is resolved
    pub fn language(&self) -> Option<Language> {
        self.state.read().language.clone()
    }

    /// Whether a language has been resolved or set
    pub fn is_initialized(&self) -> bool {
        self.state.read().language.is_some()
    }

    /// Snapshot of the current translation tree (empty before initialization)
    pub fn translations(&self) -> Arc<TranslationTree> {
        Arc::clone(&self.state.read().tree)
    }

    /// Resolve `namespaces` of the current tree
    pub fn resolve<S: AsRef<str>>(&self, namespaces: &[S]) -> TranslationMap {
        resolver::resolve(&self.translations(), namespaces)
    }

    pub fn default_language(&self) -> &Language {
        &self.default_language
    }

    pub fn supported_languages(&self) -> &[Language] {
        &self.supported_languages
    }

    pub fn is_supported(&self, language: &Language) -> bool {
        self.supported_languages.contains(language)
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.messages
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Register a listener for `event`
    pub fn add_event_listener<F>(&self, event: &str, callback: F) -> ListenerHandle
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier.add_event_listener(event, callback)
    }

    /// Remove a listener registered through [`add_event_listener`](Self::add_event_listener)
    pub fn remove_event_listener(&self, handle: &ListenerHandle) -> bool {
        self.notifier.remove_event_listener(handle)
    }

    /// Listen for translation tree changes until the returned guard is dropped
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.notifier.subscribe(TRANSLATION_TREE_CHANGE, callback)
    }

    pub fn notifier(&self) -> &Arc<ChangeNotifier> {
        &self.notifier
    }
}
