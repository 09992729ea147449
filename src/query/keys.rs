//! Cache keys and key scopes.

use crate::types::SearchFilters;

/// Identity of a cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full list.
    Translations,
    /// Keys translated into one locale.
    TranslationsByLocale(String),
    /// One record by id.
    Translation(String),
    /// Results of one search.
    TranslationSearch(SearchFilters),
    /// Sorted locale codes.
    Locales,
}

impl QueryKey {
    /// Whether the key is derived from translation records (everything but [`QueryKey::Locales`]).
    #[must_use]
    pub const fn is_translation_tree(&self) -> bool {
        !matches!(self, Self::Locales)
    }
}

/// A set of keys addressed by cancel/invalidate operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryScope {
    Exact(QueryKey),
    /// Every key derived from translation records: list, per-locale lists,
    /// per-id records and searches.
    TranslationTree,
    /// Every cached search, whatever its filters.
    Searches,
}

impl QueryScope {
    #[must_use]
    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            Self::Exact(exact) => exact == key,
            Self::TranslationTree => key.is_translation_tree(),
            Self::Searches => matches!(key, QueryKey::TranslationSearch(_)),
        }
    }
}

impl From<QueryKey> for QueryScope {
    fn from(key: QueryKey) -> Self {
        Self::Exact(key)
    }
}
