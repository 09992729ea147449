//! One user's working session: UI state, query cache and the edit mutation.

use std::sync::Arc;

use crate::api::TranslationApi;
use crate::config::ManagerSettings;
use crate::editor::EditorSession;
use crate::mutation::{
    MutationError,
    UpdateTranslationMutation,
};
use crate::query::{
    CachedData,
    QueryClient,
    QueryError,
    QueryKey,
};
use crate::store::UiStore;
use crate::types::{
    SearchFilters,
    TranslationKey,
};
use crate::view::{
    KeyListView,
    ToolbarView,
};

#[derive(Debug)]
pub struct Session {
    settings: ManagerSettings,
    store: UiStore,
    client: QueryClient,
    mutation: UpdateTranslationMutation,
}

impl Session {
    /// Starts a session with default UI state and an empty cache.
    #[must_use]
    pub fn start(settings: ManagerSettings, api: Arc<dyn TranslationApi>) -> Self {
        let client = QueryClient::new(api, settings.stale_time);
        let mutation = UpdateTranslationMutation::new(client.clone(), settings.current_user.clone());
        tracing::info!(user = %settings.current_user, "Session started");
        Self { settings, store: UiStore::new(), client, mutation }
    }

    #[must_use]
    pub const fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    #[must_use]
    pub const fn store(&self) -> &UiStore {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut UiStore {
        &mut self.store
    }

    #[must_use]
    pub const fn client(&self) -> &QueryClient {
        &self.client
    }

    #[must_use]
    pub const fn mutation(&self) -> &UpdateTranslationMutation {
        &self.mutation
    }

    /// Filters currently selected in the store.
    #[must_use]
    pub fn filters(&self) -> SearchFilters {
        self.store.search_filters()
    }

    /// Runs the search selected in the store.
    ///
    /// # Errors
    /// [`QueryError`] from the fetch.
    pub async fn search(&self) -> Result<Vec<TranslationKey>, QueryError> {
        self.client.search(&self.filters()).await
    }

    /// # Errors
    /// [`QueryError`] from the fetch.
    pub async fn locales(&self) -> Result<Vec<String>, QueryError> {
        self.client.available_locales().await
    }

    /// View of the current search as cached, without fetching.
    pub async fn view(&self) -> KeyListView {
        let filters = self.filters();
        let state = self.client.search_state(&filters).await;
        KeyListView::build(&state, &filters, &self.store)
    }

    /// Toolbar for the configured categories and the cached locale list.
    ///
    /// Locales that have not been fetched yet show as an empty list.
    pub async fn toolbar(&self) -> ToolbarView {
        let locales = match self.client.cache().get_query_data(&QueryKey::Locales).await {
            Some(CachedData::Locales(locales)) => locales,
            _ => Vec::new(),
        };
        ToolbarView::build(&self.settings.categories, &locales, &self.store)
    }

    /// Opens the editor on `(id, locale)`, seeded with the record's value.
    ///
    /// A locale the record has no translation for starts empty.
    ///
    /// # Errors
    /// [`QueryError`] when the record cannot be read.
    pub async fn open_editor(&mut self, id: &str, locale: &str) -> Result<EditorSession, QueryError> {
        let record = self.client.translation(id).await?;
        let current = record.translation(locale).map(|t| t.value.clone()).unwrap_or_default();
        self.store.open_editor(id, locale);
        Ok(EditorSession::new(id, locale, current))
    }

    /// Saves `editor` and closes it on success.
    ///
    /// # Errors
    /// See [`EditorSession::save`].
    pub async fn save(
        &mut self,
        editor: &mut EditorSession,
    ) -> Result<TranslationKey, MutationError> {
        editor.save(&mut self.store, &self.mutation).await
    }

    /// Ends the session: UI state back to defaults, cache emptied.
    pub async fn reset(&mut self) {
        self.store.reset();
        self.client.cache().clear().await;
        self.mutation.reset().await;
        tracing::info!(user = %self.settings.current_user, "Session reset");
    }
}
