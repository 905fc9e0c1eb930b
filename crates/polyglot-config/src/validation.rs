//! Field validators used by the configuration schema

use polyglot_i18n::Language;
use std::borrow::Cow;
use std::collections::HashSet;
use validator::ValidationError;

/// Validate a language code.
///
/// Codes are compared verbatim at runtime, so only obviously broken values are
/// rejected here: empty codes and codes containing whitespace or control
/// characters.
pub fn validate_language_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(ValidationError::new("empty_language_code"));
    }

    if code.chars().any(|c| c.is_whitespace() || c.is_control()) {
        let mut err = ValidationError::new("invalid_language_code");
        err.message = Some(Cow::Owned(format!(
            "language code '{}' must not contain whitespace",
            code.escape_debug()
        )));
        return Err(err);
    }

    Ok(())
}

/// Validate a single [`Language`]
pub fn validate_language(language: &Language) -> Result<(), ValidationError> {
    validate_language_code(language.as_str())
}

/// Validate the language allow-list: every code valid, no duplicates
pub fn validate_language_list(languages: &[Language]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(languages.len());

    for language in languages {
        validate_language(language)?;

        if !seen.insert(language.as_str()) {
            let mut err = ValidationError::new("duplicate_language");
            err.message = Some(Cow::Owned(format!(
                "language '{}' is listed more than once",
                language
            )));
            err.add_param(Cow::Borrowed("language"), &language.as_str());
            return Err(err);
        }
    }

    Ok(())
}

/// Validate the storage key of the persisted language preference
pub fn validate_storage_key(key: &str) -> Result<(), ValidationError> {
    if key.trim().is_empty() {
        return Err(ValidationError::new("blank_storage_key"));
    }

    if key.trim() != key {
        return Err(ValidationError::new("storage_key_surrounding_whitespace"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language_code() {
        assert!(validate_language_code("en").is_ok());
        assert!(validate_language_code("pt-BR").is_ok());
        assert!(validate_language_code("zh_Hant").is_ok());

        assert!(validate_language_code("").is_err());
        assert!(validate_language_code("en US").is_err());
        assert!(validate_language_code("en\n").is_err());
    }

    #[test]
    fn test_validate_language_list() {
        let valid: Vec<Language> = vec!["en".into(), "es".into(), "de".into()];
        assert!(validate_language_list(&valid).is_ok());
        assert!(validate_language_list(&[]).is_ok());

        let duplicated: Vec<Language> = vec!["en".into(), "es".into(), "en".into()];
        let err = validate_language_list(&duplicated).unwrap_err();
        assert_eq!(err.code, "duplicate_language");

        let blank: Vec<Language> = vec!["en".into(), "".into()];
        let err = validate_language_list(&blank).unwrap_err();
        assert_eq!(err.code, "empty_language_code");
    }

    #[test]
    fn test_validate_storage_key() {
        assert!(validate_storage_key("language").is_ok());
        assert!(validate_storage_key("app.settings.language").is_ok());

        assert!(validate_storage_key("").is_err());
        assert!(validate_storage_key("   ").is_err());
        assert!(validate_storage_key(" language").is_err());
    }
}
