//! Core types used throughout the project.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{
    SecondsFormat,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Returns the current time as an RFC 3339 UTC timestamp with millisecond precision.
#[must_use]
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A single locale's value for a translation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub value: String,
    /// RFC 3339 timestamp of the last edit.
    pub updated_at: String,
    /// Identity of the last editor.
    pub updated_by: String,
}

/// A translation key with its per-locale values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationKey {
    pub id: String,
    /// Dotted namespace key (e.g. `button.save`).
    pub key: String,
    /// Open-ended category name. See [`Category`] for the known ones.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: String,
    pub created_by: String,
    pub last_modified: String,
    /// Locale code → translation. May be empty for untranslated keys.
    #[serde(default)]
    pub translations: BTreeMap<String, Translation>,
}

impl TranslationKey {
    /// Returns the translation for `locale`, if any.
    #[must_use]
    pub fn translation(&self, locale: &str) -> Option<&Translation> {
        self.translations.get(locale)
    }

    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.translations.contains_key(locale)
    }

    #[must_use]
    pub fn has_translations(&self) -> bool {
        !self.translations.is_empty()
    }
}

/// Search criteria. Every field is optional; no fields means "all records".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    /// Case-insensitive substring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Exact, case-sensitive category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Keeps only keys that have a translation for this locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl SearchFilters {
    #[must_use]
    pub fn with_query(query: impl Into<String>) -> Self {
        Self { query: Some(query.into()), ..Self::default() }
    }

    #[must_use]
    pub fn with_category(category: impl Into<String>) -> Self {
        Self { category: Some(category.into()), ..Self::default() }
    }

    #[must_use]
    pub fn with_locale(locale: impl Into<String>) -> Self {
        Self { locale: Some(locale.into()), ..Self::default() }
    }

    /// Whether no criteria are set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.query.is_none() && self.category.is_none() && self.locale.is_none()
    }
}

/// Known translation key categories.
///
/// Unknown names are kept as [`Category::Other`] and get the default style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Buttons,
    Forms,
    Navigation,
    Messages,
    Notifications,
    Other(String),
}

impl Category {
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "buttons" => Self::Buttons,
            "forms" => Self::Forms,
            "navigation" => Self::Navigation,
            "messages" => Self::Messages,
            "notifications" => Self::Notifications,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Buttons => "buttons",
            Self::Forms => "forms",
            Self::Navigation => "navigation",
            Self::Messages => "messages",
            Self::Notifications => "notifications",
            Self::Other(name) => name,
        }
    }

    /// Display label with the first letter upper-cased (`buttons` → `Buttons`).
    #[must_use]
    pub fn display_label(&self) -> String {
        capitalize(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper-cases the first character, leaving the rest untouched.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

/// Payload of a translation edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationPatch {
    pub value: String,
}

/// Request to change one `(id, locale)` value.
///
/// Timestamp and author are attached by the system, not the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTranslationRequest {
    pub id: String,
    pub locale: String,
    pub data: TranslationPatch,
}

impl UpdateTranslationRequest {
    #[must_use]
    pub fn new(id: impl Into<String>, locale: impl Into<String>, value: impl Into<String>) -> Self {
        Self { id: id.into(), locale: locale.into(), data: TranslationPatch { value: value.into() } }
    }
}
