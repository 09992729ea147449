//! Presentation model of the translation key list.
//!
//! [`KeyListView::build`] turns the cached search result and the UI state into
//! rows that a front-end can render without further logic.

use serde::Serialize;

use crate::highlight::{
    Highlighter,
    Segment,
};
use crate::query::{
    CachedData,
    QueryError,
    QueryKey,
    QueryState,
    QueryStatus,
};
use crate::store::UiStore;
use crate::types::{
    Category,
    SearchFilters,
    TranslationKey,
    capitalize,
};

const NO_MATCHES_MESSAGE: &str = "No translations found matching your filters.";
const NO_DATA_MESSAGE: &str = "No translations available.";
const ALL_CATEGORIES_LABEL: &str = "All Categories";
const ALL_LOCALES_LABEL: &str = "All Locales";

/// Colour family of a category badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryBadge {
    Buttons,
    Forms,
    Notifications,
    Default,
}

impl CategoryBadge {
    #[must_use]
    pub fn for_category(category: &str) -> Self {
        match Category::parse(category) {
            Category::Buttons => Self::Buttons,
            Category::Forms => Self::Forms,
            Category::Notifications => Self::Notifications,
            Category::Navigation | Category::Messages | Category::Other(_) => Self::Default,
        }
    }
}

/// Short marker of a locale a key is translated into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleChip {
    pub locale: String,
    /// First two letters, upper-cased (`en` → `EN`)
    pub label: String,
}

impl LocaleChip {
    fn new(locale: &str) -> Self {
        let label = locale.to_uppercase().chars().take(2).collect();
        Self { locale: locale.to_string(), label }
    }

    /// Tooltip text.
    #[must_use]
    pub fn title(&self) -> String {
        format!("Available in {}", self.locale.to_uppercase())
    }
}

/// One translation of an expanded row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationCell {
    pub locale: String,
    pub value: Vec<Segment>,
    /// The editor is open on this cell.
    pub is_editing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRow {
    pub id: String,
    pub key: Vec<Segment>,
    pub description: Option<Vec<Segment>>,
    pub category_label: Vec<Segment>,
    pub badge: CategoryBadge,
    /// Empty when the key has no translations
    pub locale_chips: Vec<LocaleChip>,
    pub has_translations: bool,
    pub is_expanded: bool,
    /// Filled only while the row is expanded
    pub cells: Vec<TranslationCell>,
}

impl KeyRow {
    fn build(item: &TranslationKey, highlighter: &Highlighter, store: &UiStore) -> Self {
        let is_expanded = store.is_key_expanded(&item.id);
        let cells = if is_expanded {
            item.translations
                .iter()
                .map(|(locale, translation)| TranslationCell {
                    locale: locale.clone(),
                    value: highlighter.highlight(&translation.value),
                    is_editing: store.is_editing(&item.id, locale),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            id: item.id.clone(),
            key: highlighter.highlight(&item.key),
            description: item.description.as_deref().map(|text| highlighter.highlight(text)),
            category_label: highlighter.highlight(&Category::parse(&item.category).display_label()),
            badge: CategoryBadge::for_category(&item.category),
            locale_chips: item.translations.keys().map(|locale| LocaleChip::new(locale)).collect(),
            has_translations: item.has_translations(),
            is_expanded,
            cells,
        }
    }
}

/// What the key list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "camelCase")]
pub enum KeyListView {
    Loading,
    Error(String),
    Empty(String),
    Rows(Vec<KeyRow>),
}

impl KeyListView {
    /// Builds the view of the search for `filters` from its cache `state`.
    #[must_use]
    pub fn build(state: &QueryState, filters: &SearchFilters, store: &UiStore) -> Self {
        match state.status {
            QueryStatus::Pending => Self::Loading,
            QueryStatus::Error => Self::error(
                state.error.as_ref().map_or_else(String::new, ToString::to_string),
            ),
            QueryStatus::Success => match &state.data {
                Some(CachedData::Keys(items)) => Self::rows(items, filters, store),
                _ => Self::error(
                    QueryError::UnexpectedData(QueryKey::TranslationSearch(filters.clone()))
                        .to_string(),
                ),
            },
        }
    }

    /// Builds the view directly from a search result.
    #[must_use]
    pub fn rows(items: &[TranslationKey], filters: &SearchFilters, store: &UiStore) -> Self {
        if items.is_empty() {
            let message = if filters.is_empty() { NO_DATA_MESSAGE } else { NO_MATCHES_MESSAGE };
            return Self::Empty(message.to_string());
        }

        let highlighter = Highlighter::new(filters.query.as_deref().unwrap_or_default());
        Self::Rows(items.iter().map(|item| KeyRow::build(item, &highlighter, store)).collect())
    }

    fn error(message: String) -> Self {
        Self::Error(format!("Error loading translations: {message}"))
    }
}

/// One entry of a filter drop-down. `value` is `None` for the "All" entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOption {
    pub value: Option<String>,
    pub label: String,
    pub selected: bool,
}

impl FilterOption {
    fn all(label: &str, selection: Option<&str>) -> Self {
        Self { value: None, label: label.to_string(), selected: selection.is_none() }
    }

    fn choice(value: &str, label: String, selection: Option<&str>) -> Self {
        Self { value: Some(value.to_string()), label, selected: selection == Some(value) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterKind {
    Search,
    Category,
    Locale,
}

/// Chip listed under "Active filters".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFilter {
    pub kind: FilterKind,
    pub label: String,
}

/// Search box, category and locale drop-downs, and the active filter chips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarView {
    /// Raw search box contents
    pub search_query: String,
    pub category_options: Vec<FilterOption>,
    pub locale_options: Vec<FilterOption>,
    /// Shows the "Clear Filters" button and the chips row.
    pub has_filters: bool,
    pub active_filters: Vec<ActiveFilter>,
}

impl ToolbarView {
    /// Builds the toolbar from the configured `categories`, the known
    /// `locales` (empty while they load) and the filters held in `store`.
    #[must_use]
    pub fn build(categories: &[String], locales: &[String], store: &UiStore) -> Self {
        let category = store.selected_category().filter(|c| !c.is_empty());
        let locale = store.selected_locale().filter(|l| !l.is_empty());

        let category_options = std::iter::once(FilterOption::all(ALL_CATEGORIES_LABEL, category))
            .chain(categories.iter().map(|c| FilterOption::choice(c, capitalize(c), category)))
            .collect();
        let locale_options = std::iter::once(FilterOption::all(ALL_LOCALES_LABEL, locale))
            .chain(locales.iter().map(|l| FilterOption::choice(l, l.to_uppercase(), locale)))
            .collect();

        let mut active_filters = Vec::new();
        if !store.search_query().is_empty() {
            active_filters.push(ActiveFilter {
                kind: FilterKind::Search,
                label: format!("Search: {}", store.search_query()),
            });
        }
        if let Some(category) = category {
            active_filters
                .push(ActiveFilter { kind: FilterKind::Category, label: format!("Category: {category}") });
        }
        if let Some(locale) = locale {
            active_filters.push(ActiveFilter {
                kind: FilterKind::Locale,
                label: format!("Locale: {}", locale.to_uppercase()),
            });
        }

        Self {
            search_query: store.search_query().to_string(),
            category_options,
            locale_options,
            has_filters: store.has_active_filters(),
            active_filters,
        }
    }
}
