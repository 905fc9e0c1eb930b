//! Property-based invariant tests for placeholder formatting and resolution.
//!
//! 1. Formatting without arguments is the identity
//! 2. Formatting is deterministic for identical arguments
//! 3. Placeholders absent from the arguments survive verbatim
//! 4. Substituted values are never expanded again
//! 5. Templates without braces are unaffected by any arguments
//! 6. Every resolved key yields exactly a message and a formatter entry
//! 7. The last requested namespace wins on key collisions

use polyglot_i18n::{
    build_tree, resolve, Formatter, Language, MessageArgs, MessageCatalog, TranslationEntry,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn placeholder_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn plain_text() -> impl Strategy<Value = String> {
    "[^{}]{0,24}"
}

/// Template made of plain text segments separated by placeholders
fn template_with(names: Vec<String>) -> impl Strategy<Value = (String, Vec<String>)> {
    let count = names.len() + 1;
    proptest::collection::vec(plain_text(), count).prop_map(move |segments| {
        let mut template = String::new();
        for (i, segment) in segments.iter().enumerate() {
            template.push_str(segment);
            if let Some(name) = names.get(i) {
                template.push('{');
                template.push_str(name);
                template.push('}');
            }
        }
        (template, names.clone())
    })
}

fn template_strategy() -> impl Strategy<Value = (String, Vec<String>)> {
    proptest::collection::vec(placeholder_name(), 0..4).prop_flat_map(template_with)
}

proptest! {
    #[test]
    fn format_without_args_is_identity((template, _) in template_strategy()) {
        let formatter = Formatter::new(template.as_str());
        prop_assert_eq!(formatter.format(None), template);
    }

    #[test]
    fn format_is_deterministic(
        (template, names) in template_strategy(),
        value in "[^{}]{0,10}",
    ) {
        let formatter = Formatter::new(template.as_str());
        let args: MessageArgs = names.iter().map(|n| (n.as_str(), value.as_str())).collect();
        prop_assert_eq!(formatter.format(Some(&args)), formatter.format(Some(&args)));
    }

    #[test]
    fn missing_placeholders_survive((template, names) in template_strategy()) {
        let formatter = Formatter::new(template.as_str());
        let args = MessageArgs::new().with("__not_a_placeholder__", "x");
        let output = formatter.format(Some(&args));
        prop_assert_eq!(&output, &template);
        for name in names {
            let token = format!("{{{}}}", name);
            prop_assert!(output.contains(&token));
        }
    }

    #[test]
    fn substitution_is_single_pass(
        (template, names) in template_strategy(),
    ) {
        // Every placeholder is replaced by the token of another placeholder
        let formatter = Formatter::new(template.as_str());
        let args: MessageArgs = names
            .iter()
            .map(|n| (n.as_str(), format!("{{{}}}", n)))
            .collect();
        prop_assert_eq!(formatter.format(Some(&args)), template);
    }

    #[test]
    fn braceless_templates_ignore_args(
        text in plain_text(),
        name in placeholder_name(),
        value in ".{0,10}",
    ) {
        let formatter = Formatter::new(text.as_str());
        let args = MessageArgs::new().with(name, value);
        prop_assert_eq!(formatter.format(Some(&args)), text);
    }

    #[test]
    fn resolved_keys_come_in_pairs(
        messages in proptest::collection::btree_map(placeholder_name(), plain_text(), 0..8),
    ) {
        let catalog = MessageCatalog::new().with_namespace("en", "ns", messages.clone());
        let tree = build_tree(&catalog, &Language::from("en")).unwrap();
        let map = resolve(&tree, &["ns"]);

        prop_assert_eq!(map.len(), messages.len() * 2);
        for (key, template) in &messages {
            prop_assert_eq!(
                map.get(&format!("{}Message", key)),
                Some(&TranslationEntry::Message(template.clone()))
            );
            let formatted = map.format(key, None);
            prop_assert_eq!(formatted.as_ref(), Some(template));
        }
    }

    #[test]
    fn last_namespace_wins(
        shared in proptest::collection::btree_set(placeholder_name(), 1..6),
        first in plain_text(),
        second in plain_text(),
    ) {
        let a: BTreeMap<String, String> =
            shared.iter().map(|k| (k.clone(), first.clone())).collect();
        let b: BTreeMap<String, String> =
            shared.iter().map(|k| (k.clone(), second.clone())).collect();
        let catalog = MessageCatalog::new()
            .with_namespace("en", "a", a)
            .with_namespace("en", "b", b);
        let tree = build_tree(&catalog, &Language::from("en")).unwrap();

        let map = resolve(&tree, &["a", "b"]);
        for key in &shared {
            prop_assert_eq!(map.message(key), Some(second.as_str()));
        }
        prop_assert_eq!(map.collisions().len(), shared.len());
    }
}
