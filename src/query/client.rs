use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use super::{
    CachedData,
    QueryCache,
    QueryError,
    QueryKey,
    QueryState,
};
use crate::api::TranslationApi;
use crate::config::StaleTimeConfig;
use crate::types::{
    SearchFilters,
    TranslationKey,
};

/// Typed reads over a [`QueryCache`] backed by a [`TranslationApi`].
///
/// Clones share the cache and the data source.
#[derive(Clone)]
pub struct QueryClient {
    api: Arc<dyn TranslationApi>,
    cache: Arc<QueryCache>,
    stale_time: StaleTimeConfig,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("cache", &self.cache)
            .field("stale_time", &self.stale_time)
            .finish_non_exhaustive()
    }
}

impl QueryClient {
    #[must_use]
    pub fn new(api: Arc<dyn TranslationApi>, stale_time: StaleTimeConfig) -> Self {
        Self { api, cache: Arc::new(QueryCache::new()), stale_time }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    #[must_use]
    pub fn api(&self) -> &Arc<dyn TranslationApi> {
        &self.api
    }

    #[must_use]
    pub const fn stale_time(&self) -> &StaleTimeConfig {
        &self.stale_time
    }

    /// Keys matching `filters`. Each distinct filter set is cached on its own.
    ///
    /// # Errors
    /// [`QueryError`] from the fetch.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<TranslationKey>, QueryError> {
        let key = QueryKey::TranslationSearch(filters.clone());
        let api = Arc::clone(&self.api);
        let filters = filters.clone();
        let data = self
            .cache
            .fetch(key.clone(), self.stale_time.search(), move || {
                async move { api.search(&filters).await.map(CachedData::Keys) }.boxed()
            })
            .await?;
        expect_keys(key, data)
    }

    /// # Errors
    /// [`QueryError`] from the fetch.
    pub async fn translations(&self) -> Result<Vec<TranslationKey>, QueryError> {
        let api = Arc::clone(&self.api);
        let data = self
            .cache
            .fetch(QueryKey::Translations, self.stale_time.search(), move || {
                async move { api.list().await.map(CachedData::Keys) }.boxed()
            })
            .await?;
        expect_keys(QueryKey::Translations, data)
    }

    /// # Errors
    /// [`QueryError`] from the fetch.
    pub async fn translations_by_locale(
        &self,
        locale: &str,
    ) -> Result<Vec<TranslationKey>, QueryError> {
        let key = QueryKey::TranslationsByLocale(locale.to_string());
        let api = Arc::clone(&self.api);
        let locale = locale.to_string();
        let data = self
            .cache
            .fetch(key.clone(), self.stale_time.search(), move || {
                async move { api.list_by_locale(&locale).await.map(CachedData::Keys) }.boxed()
            })
            .await?;
        expect_keys(key, data)
    }

    /// One record by id.
    ///
    /// # Errors
    /// [`QueryError::Api`] with `NotFound` for an unknown id.
    pub async fn translation(&self, id: &str) -> Result<TranslationKey, QueryError> {
        let key = QueryKey::Translation(id.to_string());
        let api = Arc::clone(&self.api);
        let id = id.to_string();
        let data = self
            .cache
            .fetch(key.clone(), self.stale_time.detail(), move || {
                async move { api.get(&id).await.map(CachedData::Key) }.boxed()
            })
            .await?;
        match data {
            CachedData::Key(record) => Ok(record),
            _ => Err(QueryError::UnexpectedData(key)),
        }
    }

    /// Sorted locale codes.
    ///
    /// # Errors
    /// [`QueryError`] from the fetch.
    pub async fn available_locales(&self) -> Result<Vec<String>, QueryError> {
        let api = Arc::clone(&self.api);
        let data = self
            .cache
            .fetch(QueryKey::Locales, self.stale_time.locales(), move || {
                async move { api.locales().await.map(CachedData::Locales) }.boxed()
            })
            .await?;
        match data {
            CachedData::Locales(locales) => Ok(locales),
            _ => Err(QueryError::UnexpectedData(QueryKey::Locales)),
        }
    }

    /// Cache state of the search for `filters`, without fetching.
    pub async fn search_state(&self, filters: &SearchFilters) -> QueryState {
        self.query_state(&QueryKey::TranslationSearch(filters.clone())).await
    }

    /// Cache state of `key`, judged against the stale time for its kind.
    pub async fn query_state(&self, key: &QueryKey) -> QueryState {
        self.cache.query_state(key, self.stale_time_for(key)).await
    }

    const fn stale_time_for(&self, key: &QueryKey) -> Duration {
        match key {
            QueryKey::Translation(_) => self.stale_time.detail(),
            QueryKey::Locales => self.stale_time.locales(),
            QueryKey::Translations
            | QueryKey::TranslationsByLocale(_)
            | QueryKey::TranslationSearch(_) => self.stale_time.search(),
        }
    }
}

fn expect_keys(key: QueryKey, data: CachedData) -> Result<Vec<TranslationKey>, QueryError> {
    match data {
        CachedData::Keys(keys) => Ok(keys),
        _ => Err(QueryError::UnexpectedData(key)),
    }
}
