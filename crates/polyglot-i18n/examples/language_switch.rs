//! Demonstrates language switching with a persisted preference and a live
//! translation binding.
//!
//! Run twice to see the stored language picked up on the second start:
//!
//! ```text
//! cargo run -p polyglot-i18n --example language_switch
//! ```

use anyhow::Result;
use polyglot_common::{init_logging, LoggingConfig};
use polyglot_i18n::{
    message_args, JsonFileStore, Localization, LocalizationOptions, MessageCatalog,
    TranslationBinding,
};
use std::sync::Arc;
use tracing::info;

fn catalog() -> MessageCatalog {
    MessageCatalog::new()
        .with_namespace(
            "en",
            "inbox",
            [
                ("title", "Inbox"),
                ("unread", "Hello {name}, you have {count} unread messages"),
            ],
        )
        .with_namespace(
            "de",
            "inbox",
            [
                ("title", "Posteingang"),
                ("unread", "Hallo {name}, du hast {count} ungelesene Nachrichten"),
            ],
        )
}

fn main() -> Result<()> {
    init_logging(LoggingConfig {
        level: "polyglot_i18n=debug,language_switch=info".to_string(),
        pretty_format: false,
        ..LoggingConfig::default()
    })?;

    let options = LocalizationOptions {
        messages: catalog(),
        default_language: "en".into(),
        supported_languages: vec!["en".into(), "de".into()],
        language_storage_key: "language".to_string(),
    };

    let store_path = std::env::temp_dir().join("polyglot-language-switch.json");
    let localization = Arc::new(Localization::start(options, JsonFileStore::new(&store_path))?);
    let binding = TranslationBinding::new(&localization);

    let render = |binding: &TranslationBinding| {
        let inbox = binding.translations(&["inbox"]);
        let args = message_args!["name" => "Ana", "count" => 3];
        info!(
            title = %inbox.format_or_key("title", None),
            line = %inbox.format_or_key("unread", args.as_ref()),
            "Rendered inbox"
        );
    };

    render(&binding);

    let next = if localization.language().is_some_and(|l| l == "en") {
        "de"
    } else {
        "en"
    };
    let change = localization.set_language(next)?;
    if let Some(err) = &change.persistence_error {
        info!(%err, "Language switched but not persisted");
    }

    render(&binding);

    if let Err(err) = localization.set_language("fr") {
        info!(%err, "Rejected language switch");
    }

    Ok(())
}
