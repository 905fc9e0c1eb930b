//! Translation tree construction
//!
//! A [`TranslationTree`] is the language-scoped view of a [`MessageCatalog`]:
//! namespace → key → template for exactly one language. Trees are built
//! wholesale and never patched; a language switch produces a new tree.

use crate::catalog::{LanguageMessages, MessageCatalog, NamespaceMessages};
use crate::error::{I18nError, I18nResult};
use crate::Language;
use tracing::debug;

/// Flattened per-namespace messages for one language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTree {
    language: Option<Language>,
    namespaces: LanguageMessages,
}

impl TranslationTree {
    /// Language the tree was built for; `None` for the empty pre-initialization tree
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    /// Messages of one namespace
    pub fn namespace(&self, namespace: &str) -> Option<&NamespaceMessages> {
        self.namespaces.get(namespace)
    }

    /// Look up one template
    pub fn message(&self, namespace: &str, key: &str) -> Option<&str> {
        self.namespaces.get(namespace)?.get(key).map(String::as_str)
    }

    /// Namespace names in lexical order
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.keys().map(String::as_str)
    }

    /// The whole tree as a map
    pub fn as_map(&self) -> &LanguageMessages {
        &self.namespaces
    }

    /// Total number of messages across all namespaces
    pub fn len(&self) -> usize {
        self.namespaces.values().map(NamespaceMessages::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the translation tree for `language`.
///
/// The returned tree owns a copy of the catalog entries, so it stays valid
/// independently of the catalog it was built from.
pub fn build(catalog: &MessageCatalog, language: &Language) -> I18nResult<TranslationTree> {
    let messages = catalog
        .language(language.as_str())
        .ok_or_else(|| I18nError::UnknownLanguage {
            language: language.clone(),
        })?;

    let tree = TranslationTree {
        language: Some(language.clone()),
        namespaces: messages.clone(),
    };

    debug!(
        language = %language,
        namespaces = tree.namespaces.len(),
        messages = tree.len(),
        "Built translation tree"
    );

    Ok(tree)
}
