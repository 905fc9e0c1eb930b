//! Translation resolution
//!
//! Turns a [`TranslationTree`] plus an ordered list of namespaces into a flat
//! [`TranslationMap`]. Every message key `k` yields two entries:
//!
//! - `"{k}Message"`: the raw template string
//! - `"{k}"`: a [`Formatter`] that fills `{name}` placeholders
//!
//! When two requested namespaces define the same key, the namespace requested
//! later wins. Collisions are logged and recorded on the map; use
//! [`resolve_strict`] to reject them instead.

use crate::error::{I18nError, I18nResult};
use crate::tree::TranslationTree;
use crate::Language;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Suffix of the entry holding a message's raw template
pub const MESSAGE_SUFFIX: &str = "Message";

/// Conversion of placeholder values into their substituted text.
///
/// `None` (and therefore any `Option::None`) substitutes the empty string.
pub trait IntoArgValue {
    fn into_arg_value(self) -> Option<String>;
}

macro_rules! impl_into_arg_value_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoArgValue for $ty {
                fn into_arg_value(self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

impl_into_arg_value_display!(
    &str, String, &String, Cow<'_, str>, char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32,
    u64, u128, usize, f32, f64, Language, &Language,
);

impl<T: IntoArgValue> IntoArgValue for Option<T> {
    fn into_arg_value(self) -> Option<String> {
        self.and_then(IntoArgValue::into_arg_value)
    }
}

/// Named placeholder values for a [`Formatter`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageArgs {
    values: BTreeMap<String, Option<String>>,
}

impl MessageArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder value
    pub fn with(mut self, name: impl Into<String>, value: impl IntoArgValue) -> Self {
        self.set(name, value);
        self
    }

    /// Set a placeholder value in place
    pub fn set(&mut self, name: impl Into<String>, value: impl IntoArgValue) -> &mut Self {
        self.values.insert(name.into(), value.into_arg_value());
        self
    }

    /// Text substituted for `name`, if `name` is an argument at all
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|value| value.as_deref().unwrap_or(""))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for MessageArgs
where
    K: Into<String>,
    V: IntoArgValue,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (name, value) in iter {
            args.set(name, value);
        }
        args
    }
}

/// Macro to create optional [`MessageArgs`] more easily
///
/// `message_args![]` is `None`, which makes formatters return the raw template.
#[macro_export]
macro_rules! message_args {
    () => {
        None
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut args = $crate::MessageArgs::new();
        $(
            args.set($name, $value);
        )+
        Some(args)
    }};
}

/// A placeholder occurrence: byte range of `{name}` and the name itself
struct Placeholder<'a> {
    start: usize,
    end: usize,
    name: &'a str,
}

/// Scan `template` for `{name}` tokens, left to right, without nesting
fn placeholders(template: &str) -> impl Iterator<Item = Placeholder<'_>> {
    let mut cursor = 0;
    std::iter::from_fn(move || {
        while let Some(offset) = template[cursor..].find('{') {
            let start = cursor + offset;
            let body = &template[start + 1..];
            match body.find(|c| c == '{' || c == '}') {
                Some(close) if body.as_bytes()[close] == b'}' => {
                    let end = start + 1 + close + 1;
                    cursor = end;
                    return Some(Placeholder {
                        start,
                        end,
                        name: &body[..close],
                    });
                }
                // Another `{` opens first: this one is literal text
                Some(_) => cursor = start + 1,
                None => return None,
            }
        }
        None
    })
}

/// Placeholder substitution for one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    template: String,
}

impl Formatter {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The raw template
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Distinct placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for placeholder in placeholders(&self.template) {
            if !names.contains(&placeholder.name) {
                names.push(placeholder.name);
            }
        }
        names
    }

    /// Fill the template.
    ///
    /// Without arguments the template is returned verbatim. With arguments,
    /// every `{name}` whose name is an argument is replaced by its value (empty
    /// for `None`); other placeholders stay as literal text. Substituted text
    /// is never scanned again.
    pub fn format(&self, args: Option<&MessageArgs>) -> String {
        let Some(args) = args else {
            return self.template.clone();
        };

        let mut output = String::with_capacity(self.template.len());
        let mut copied = 0;
        for placeholder in placeholders(&self.template) {
            if let Some(value) = args.get(placeholder.name) {
                output.push_str(&self.template[copied..placeholder.start]);
                output.push_str(value);
                copied = placeholder.end;
            }
        }
        output.push_str(&self.template[copied..]);
        output
    }
}

/// One entry of the flat translation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationEntry {
    /// Raw template, stored under `"{key}Message"`
    Message(String),
    /// Formatter, stored under `"{key}"`
    Formatter(Formatter),
}

/// A key defined by more than one requested namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    pub key: String,
    /// Defining namespaces in request order; the last one won
    pub namespaces: Vec<String>,
}

/// Flat key → message / formatter table for a set of namespaces
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationMap {
    language: Option<Language>,
    entries: BTreeMap<String, TranslationEntry>,
    collisions: Vec<KeyCollision>,
}

impl TranslationMap {
    /// Language of the tree this map was resolved from
    pub fn language(&self) -> Option<&Language> {
        self.language.as_ref()
    }

    /// Entry by its table name (`"greeting"` or `"greetingMessage"`)
    pub fn get(&self, entry: &str) -> Option<&TranslationEntry> {
        self.entries.get(entry)
    }

    /// Raw template of `key`
    pub fn message(&self, key: &str) -> Option<&str> {
        match self.entries.get(&format!("{key}{MESSAGE_SUFFIX}"))? {
            TranslationEntry::Message(template) => Some(template),
            TranslationEntry::Formatter(_) => None,
        }
    }

    /// Formatter of `key`
    pub fn formatter(&self, key: &str) -> Option<&Formatter> {
        match self.entries.get(key)? {
            TranslationEntry::Formatter(formatter) => Some(formatter),
            TranslationEntry::Message(_) => None,
        }
    }

    /// Format `key`; `None` when the key is not in the map
    pub fn format(&self, key: &str, args: Option<&MessageArgs>) -> Option<String> {
        self.formatter(key).map(|formatter| formatter.format(args))
    }

    /// Format `key`, falling back to the key itself when it is not in the map
    pub fn format_or_key(&self, key: &str, args: Option<&MessageArgs>) -> String {
        self.format(key, args).unwrap_or_else(|| {
            warn!(key, "Translation key not found");
            key.to_string()
        })
    }

    /// Entry names in lexical order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries (two per message key)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that more than one requested namespace defined
    pub fn collisions(&self) -> &[KeyCollision] {
        &self.collisions
    }
}

/// Resolve `namespaces` of `tree` into a flat table, later namespaces winning.
///
/// Namespaces the tree does not contain contribute nothing.
pub fn resolve<S: AsRef<str>>(tree: &TranslationTree, namespaces: &[S]) -> TranslationMap {
    let mut entries = BTreeMap::new();
    let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();

    for namespace in namespaces {
        let namespace = namespace.as_ref();
        let Some(messages) = tree.namespace(namespace) else {
            warn!(
                namespace,
                language = ?tree.language().map(Language::as_str),
                "Requested namespace not present in translation tree"
            );
            continue;
        };

        for (key, template) in messages {
            let defined_by = owners.entry(key.as_str()).or_default();
            if defined_by.last() != Some(&namespace) {
                defined_by.push(namespace);
            }

            entries.insert(
                format!("{key}{MESSAGE_SUFFIX}"),
                TranslationEntry::Message(template.clone()),
            );
            entries.insert(
                key.clone(),
                TranslationEntry::Formatter(Formatter::new(template.as_str())),
            );
        }
    }

    let mut collisions: Vec<KeyCollision> = owners
        .into_iter()
        .filter(|(_, defined_by)| defined_by.len() > 1)
        .map(|(key, defined_by)| KeyCollision {
            key: key.to_string(),
            namespaces: defined_by.into_iter().map(str::to_string).collect(),
        })
        .collect();
    collisions.sort_by(|a, b| a.key.cmp(&b.key));

    for collision in &collisions {
        debug!(
            key = %collision.key,
            namespaces = ?collision.namespaces,
            "Key defined by several namespaces; last one wins"
        );
    }

    TranslationMap {
        language: tree.language().cloned(),
        entries,
        collisions,
    }
}

/// Like [`resolve`], but fails on the first key defined by two namespaces
pub fn resolve_strict<S: AsRef<str>>(
    tree: &TranslationTree,
    namespaces: &[S],
) -> I18nResult<TranslationMap> {
    let map = resolve(tree, namespaces);
    match map.collisions.first() {
        Some(collision) => Err(I18nError::KeyCollision {
            key: collision.key.clone(),
            namespaces: collision.namespaces.clone(),
        }),
        None => Ok(map),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MessageCatalog;
    use crate::tree;

    const TEMPLATE: &str = "Hello {name}, you have {count} items";

    fn tree() -> TranslationTree {
        let catalog = MessageCatalog::new()
            .with_message("en", "a", "greeting", "Hi from A")
            .with_message("en", "a", "only_a", "A")
            .with_message("en", "b", "greeting", "Hi from B")
            .with_message("en", "b", "summary", TEMPLATE);
        tree::build(&catalog, &Language::from("en")).unwrap()
    }

    #[test]
    fn test_entries_for_each_key() {
        let map = resolve(&tree(), &["a"]);
        assert_eq!(map.len(), 4);
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["greeting", "greetingMessage", "only_a", "only_aMessage"]
        );
        assert_eq!(
            map.get("greetingMessage"),
            Some(&TranslationEntry::Message("Hi from A".to_string()))
        );
        assert_eq!(map.message("only_a"), Some("A"));
        assert_eq!(map.language(), Some(&Language::from("en")));
    }

    #[test]
    fn test_later_namespace_wins() {
        let map = resolve(&tree(), &["a", "b"]);
        assert_eq!(map.message("greeting"), Some("Hi from B"));
        assert_eq!(map.format("greeting", None).as_deref(), Some("Hi from B"));
        assert_eq!(
            map.collisions(),
            &[KeyCollision {
                key: "greeting".to_string(),
                namespaces: vec!["a".to_string(), "b".to_string()],
            }]
        );

        let reversed = resolve(&tree(), &["b", "a"]);
        assert_eq!(reversed.message("greeting"), Some("Hi from A"));
    }

    #[test]
    fn test_repeated_namespace_is_not_a_collision() {
        let map = resolve(&tree(), &["a", "a"]);
        assert!(map.collisions().is_empty());
        assert!(resolve_strict(&tree(), &["a", "a"]).is_ok());
    }

    #[test]
    fn test_strict_resolution_rejects_collisions() {
        let err = resolve_strict(&tree(), &["a", "b"]).unwrap_err();
        assert!(matches!(err, I18nError::KeyCollision { ref key, .. } if key == "greeting"));
    }

    #[test]
    fn test_missing_namespace_contributes_nothing() {
        let map = resolve(&tree(), &["missing", "a"]);
        assert_eq!(map.len(), 4);
        assert!(resolve(&tree(), &["missing"]).is_empty());
    }

    #[test]
    fn test_partial_fill_leaves_unknown_placeholders() {
        let formatter = Formatter::new(TEMPLATE);
        let args = MessageArgs::new().with("name", "Ana");
        assert_eq!(formatter.format(Some(&args)), "Hello Ana, you have {count} items");
    }

    #[test]
    fn test_none_values_become_empty() {
        let formatter = Formatter::new(TEMPLATE);
        let args = MessageArgs::new()
            .with("name", None::<&str>)
            .with("count", "3");
        assert_eq!(formatter.format(Some(&args)), "Hello , you have 3 items");
    }

    #[test]
    fn test_no_args_returns_template() {
        let formatter = Formatter::new(TEMPLATE);
        assert_eq!(formatter.format(None), TEMPLATE);
        assert_eq!(formatter.format(message_args![]), TEMPLATE);
    }

    #[test]
    fn test_empty_args_returns_template() {
        let formatter = Formatter::new(TEMPLATE);
        assert_eq!(formatter.format(Some(&MessageArgs::new())), TEMPLATE);
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let formatter = Formatter::new("{x} and {x} and {y}");
        let args = message_args!["x" => 1, "y" => 'z'];
        assert_eq!(formatter.format(args.as_ref()), "1 and 1 and z");
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let formatter = Formatter::new("{a} / {b}");
        let args = message_args!["a" => "{b}", "b" => "B"];
        assert_eq!(formatter.format(args.as_ref()), "{b} / B");
    }

    #[test]
    fn test_brace_edge_cases() {
        let args = message_args!["name" => "Ana"];
        assert_eq!(Formatter::new("{{name}}").format(args.as_ref()), "{Ana}");
        assert_eq!(Formatter::new("{ name }").format(args.as_ref()), "{ name }");
        assert_eq!(Formatter::new("open {name").format(args.as_ref()), "open {name");
        assert_eq!(Formatter::new("}{name}{").format(args.as_ref()), "}Ana{");
    }

    #[test]
    fn test_placeholder_names() {
        let formatter = Formatter::new(TEMPLATE);
        assert_eq!(formatter.placeholders(), vec!["name", "count"]);
        assert!(Formatter::new("plain").placeholders().is_empty());
        assert_eq!(Formatter::new("{a}{b}{a}").placeholders(), vec!["a", "b"]);
    }

    #[test]
    fn test_args_from_iterator() {
        let args: MessageArgs = [("name", "Ana"), ("count", "2")].into_iter().collect();
        assert_eq!(args.len(), 2);
        assert_eq!(args.get("count"), Some("2"));
        assert_eq!(args.get("missing"), None);
    }

    #[test]
    fn test_format_or_key() {
        let map = resolve(&tree(), &["a"]);
        assert_eq!(map.format_or_key("only_a", None), "A");
        assert_eq!(map.format_or_key("nope", None), "nope");
    }
}
