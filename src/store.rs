//! Session-scoped UI state: filter criteria, expanded rows and the open editor.
//!
//! The store is a plain owned value. Whoever owns the session creates it at
//! start-up and calls [`UiStore::reset`] when the session ends.

use std::collections::HashSet;

use crate::types::SearchFilters;

/// Which `(translation id, locale)` pair is being edited, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditorState {
    #[default]
    Idle,
    Editing { translation_id: String, locale: String },
}

/// UI state for one session.
#[derive(Debug, Clone, Default)]
pub struct UiStore {
    /// At most one editor is open at a time.
    editor: EditorState,
    /// Ids of keys whose translations are shown.
    expanded_keys: HashSet<String>,
    /// Raw search box contents (untrimmed).
    search_query: String,
    selected_category: Option<String>,
    selected_locale: Option<String>,
}

impl UiStore {
    /// Creates a store with every field empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the editor for `(translation_id, locale)`.
    ///
    /// Any other open editor is discarded without saving.
    pub fn open_editor(&mut self, translation_id: impl Into<String>, locale: impl Into<String>) {
        let translation_id = translation_id.into();
        let locale = locale.into();
        if let EditorState::Editing { translation_id: previous_id, locale: previous_locale } =
            &self.editor
        {
            tracing::trace!(%previous_id, %previous_locale, "Discarding open editor");
        }
        tracing::trace!(%translation_id, %locale, "Opening editor");
        self.editor = EditorState::Editing { translation_id, locale };
    }

    pub fn close_editor(&mut self) {
        tracing::trace!("Closing editor");
        self.editor = EditorState::Idle;
    }

    #[must_use]
    pub const fn editor(&self) -> &EditorState {
        &self.editor
    }

    #[must_use]
    pub fn is_editing(&self, translation_id: &str, locale: &str) -> bool {
        matches!(
            &self.editor,
            EditorState::Editing { translation_id: id, locale: l } if id == translation_id && l == locale
        )
    }

    /// Flips the expansion state of `key_id`. Returns the new state.
    pub fn toggle_key_expansion(&mut self, key_id: &str) -> bool {
        let expanded = if self.expanded_keys.remove(key_id) {
            false
        } else {
            self.expanded_keys.insert(key_id.to_string());
            true
        };
        tracing::trace!(key_id, expanded, "Toggled key expansion");
        expanded
    }

    #[must_use]
    pub fn is_key_expanded(&self, key_id: &str) -> bool {
        self.expanded_keys.contains(key_id)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        tracing::trace!(query = %self.search_query, "Search query changed");
    }

    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_selected_category(&mut self, category: Option<String>) {
        tracing::trace!(?category, "Category filter changed");
        self.selected_category = category;
    }

    #[must_use]
    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn set_selected_locale(&mut self, locale: Option<String>) {
        tracing::trace!(?locale, "Locale filter changed");
        self.selected_locale = locale;
    }

    #[must_use]
    pub fn selected_locale(&self) -> Option<&str> {
        self.selected_locale.as_deref()
    }

    /// Clears query, category and locale. Editor and expansion are untouched.
    pub fn clear_filters(&mut self) {
        tracing::trace!("Clearing filters");
        self.search_query.clear();
        self.selected_category = None;
        self.selected_locale = None;
    }

    /// Whether any filter control holds a value.
    ///
    /// Looks at the raw search box, so whitespace alone counts as a filter
    /// even though [`search_filters`](Self::search_filters) drops it.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search_query.is_empty()
            || self.selected_category.as_deref().is_some_and(|c| !c.is_empty())
            || self.selected_locale.as_deref().is_some_and(|l| !l.is_empty())
    }

    /// Current criteria as [`SearchFilters`].
    ///
    /// The query is trimmed and dropped when blank; empty selections are dropped.
    #[must_use]
    pub fn search_filters(&self) -> SearchFilters {
        let query = self.search_query.trim();
        SearchFilters {
            query: (!query.is_empty()).then(|| query.to_string()),
            category: self.selected_category.clone().filter(|c| !c.is_empty()),
            locale: self.selected_locale.clone().filter(|l| !l.is_empty()),
        }
    }

    /// Returns every field to its start-of-session default.
    pub fn reset(&mut self) {
        tracing::debug!("Resetting UI state");
        *self = Self::default();
    }
}
