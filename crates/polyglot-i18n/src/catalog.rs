//! Message catalog: language → namespace → key → template

use crate::Language;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Messages of a single namespace, keyed by message key
pub type NamespaceMessages = BTreeMap<String, String>;

/// All namespaces of a single language
pub type LanguageMessages = BTreeMap<String, NamespaceMessages>;

/// Immutable dictionary of message templates for every language.
///
/// Deserializes from the natural nested document shape:
///
/// ```yaml
/// en:
///   common:
///     greeting: "Hello {name}"
/// de:
///   common:
///     greeting: "Hallo {name}"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageCatalog {
    languages: BTreeMap<Language, LanguageMessages>,
}

/// Location of a message inside one language of the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessagePath {
    pub namespace: String,
    pub key: String,
}

impl fmt::Display for MessagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.key)
    }
}

/// Key coverage of one language relative to a reference language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCoverage {
    pub language: Language,
    /// Present in the reference language, absent here
    pub missing: Vec<MessagePath>,
    /// Present here, absent in the reference language
    pub extra: Vec<MessagePath>,
}

impl LanguageCoverage {
    /// Whether this language defines exactly the reference key set
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

impl MessageCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single template, creating the language and namespace on demand
    pub fn with_message(
        mut self,
        language: impl Into<Language>,
        namespace: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.languages
            .entry(language.into())
            .or_default()
            .entry(namespace.into())
            .or_default()
            .insert(key.into(), template.into());
        self
    }

    /// Add a whole namespace for a language, replacing any previous one
    pub fn with_namespace<I, K, V>(
        mut self,
        language: impl Into<Language>,
        namespace: impl Into<String>,
        messages: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let messages = messages
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.languages
            .entry(language.into())
            .or_default()
            .insert(namespace.into(), messages);
        self
    }

    /// Languages with at least an (possibly empty) entry
    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.languages.keys()
    }

    /// Whether the catalog has an entry for `language`
    pub fn contains_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    /// All namespaces of a language
    pub fn language(&self, language: &str) -> Option<&LanguageMessages> {
        self.languages.get(language)
    }

    /// Look up one template
    pub fn message(&self, language: &str, namespace: &str, key: &str) -> Option<&str> {
        self.languages
            .get(language)?
            .get(namespace)?
            .get(key)
            .map(String::as_str)
    }

    /// Whether the catalog holds no languages
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    fn paths(messages: &LanguageMessages) -> BTreeSet<MessagePath> {
        messages
            .iter()
            .flat_map(|(namespace, keys)| {
                keys.keys().map(move |key| MessagePath {
                    namespace: namespace.clone(),
                    key: key.clone(),
                })
            })
            .collect()
    }

    /// Compare every other language against `reference`.
    ///
    /// Returns `None` when the reference language itself is absent.
    pub fn coverage(&self, reference: &str) -> Option<Vec<LanguageCoverage>> {
        let expected = Self::paths(self.languages.get(reference)?);

        let report = self
            .languages
            .iter()
            .filter(|(language, _)| language.as_str() != reference)
            .map(|(language, messages)| {
                let actual = Self::paths(messages);
                LanguageCoverage {
                    language: language.clone(),
                    missing: expected.difference(&actual).cloned().collect(),
                    extra: actual.difference(&expected).cloned().collect(),
                }
            })
            .collect();

        Some(report)
    }
}

impl From<BTreeMap<Language, LanguageMessages>> for MessageCatalog {
    fn from(languages: BTreeMap<Language, LanguageMessages>) -> Self {
        Self { languages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MessageCatalog {
        MessageCatalog::new()
            .with_message("en", "common", "greeting", "Hello {name}")
            .with_message("en", "common", "farewell", "Bye")
            .with_message("en", "cart", "items", "{count} items")
            .with_message("de", "common", "greeting", "Hallo {name}")
            .with_message("de", "common", "shrug", "Tja")
    }

    #[test]
    fn test_lookup() {
        let catalog = catalog();
        assert_eq!(catalog.message("en", "common", "greeting"), Some("Hello {name}"));
        assert_eq!(catalog.message("de", "cart", "items"), None);
        assert_eq!(catalog.message("fr", "common", "greeting"), None);
        assert!(catalog.contains_language("de"));
        assert!(!catalog.contains_language("fr"));
    }

    #[test]
    fn test_coverage_reports_missing_and_extra_keys() {
        let report = catalog().coverage("en").unwrap();
        assert_eq!(report.len(), 1);

        let de = &report[0];
        assert_eq!(de.language, "de");
        assert!(!de.is_complete());
        let missing: Vec<String> = de.missing.iter().map(ToString::to_string).collect();
        assert_eq!(missing, vec!["cart.items", "common.farewell"]);
        let extra: Vec<String> = de.extra.iter().map(ToString::to_string).collect();
        assert_eq!(extra, vec!["common.shrug"]);
    }

    #[test]
    fn test_coverage_without_reference() {
        assert!(catalog().coverage("fr").is_none());
    }

    #[test]
    fn test_deserializes_nested_document() {
        let catalog: MessageCatalog = serde_json::from_str(
            r#"{"en": {"common": {"greeting": "Hi"}}, "es": {"common": {"greeting": "Hola"}}}"#,
        )
        .unwrap();
        assert_eq!(catalog.message("es", "common", "greeting"), Some("Hola"));
        assert_eq!(catalog.languages().count(), 2);
    }
}
