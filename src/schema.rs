//! Validation of translation records and edit requests.
//!
//! Validators collect every problem they find and return them together, so the
//! caller can show the first message inline or report them all.

use chrono::DateTime;
use thiserror::Error;

use crate::types::{
    Translation,
    TranslationKey,
    UpdateTranslationRequest,
};

/// Message shown when a translation value is empty.
pub const EMPTY_TRANSLATION_MESSAGE: &str = "Translation cannot be empty";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation error in '{field_path}': {message}")]
pub struct ValidationError {
    /// Path to the field (e.g., "translations.en.value")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Returns the message to display inline, falling back to a generic one.
#[must_use]
pub fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map_or("Invalid input", |error| error.message.as_str())
}

/// Formats a list of errors as a numbered, multi-line string.
pub(crate) fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checks a single translation value.
///
/// # Errors
/// - `value` is empty
/// - `updatedAt` is not an RFC 3339 date-time
pub fn validate_translation(translation: &Translation) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_translation("", translation, &mut errors);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Checks a translation key record and every translation it carries.
///
/// # Errors
/// - `id`, `key` or `category` is empty
/// - Any translation fails [`validate_translation`]
pub fn validate_translation_key(key: &TranslationKey) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if key.id.is_empty() {
        errors.push(ValidationError::new("id", "ID is required"));
    }
    if key.key.is_empty() {
        errors.push(ValidationError::new("key", "Key is required"));
    }
    if key.category.is_empty() {
        errors.push(ValidationError::new("category", "Category is required"));
    }

    for (locale, translation) in &key.translations {
        check_translation(&format!("translations.{locale}."), translation, &mut errors);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Checks an edit request before it is dispatched.
///
/// Only the value is caller-supplied; timestamp and author are attached later.
///
/// # Errors
/// - `data.value` is empty
pub fn validate_update(request: &UpdateTranslationRequest) -> Result<(), Vec<ValidationError>> {
    if request.data.value.is_empty() {
        return Err(vec![ValidationError::new("data.value", EMPTY_TRANSLATION_MESSAGE)]);
    }
    Ok(())
}

fn check_translation(prefix: &str, translation: &Translation, errors: &mut Vec<ValidationError>) {
    if translation.value.is_empty() {
        errors.push(ValidationError::new(format!("{prefix}value"), EMPTY_TRANSLATION_MESSAGE));
    }
    if DateTime::parse_from_rfc3339(&translation.updated_at).is_err() {
        errors.push(ValidationError::new(format!("{prefix}updatedAt"), "Invalid datetime"));
    }
}
