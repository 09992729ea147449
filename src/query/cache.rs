//! Keyed query cache with freshness, single-flight fetches and cancellation.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{
    BoxFuture,
    Shared,
};
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{
    QueryError,
    QueryKey,
    QueryScope,
};
use crate::api::ApiError;
use crate::types::TranslationKey;

/// Value stored under a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedData {
    Keys(Vec<TranslationKey>),
    Key(TranslationKey),
    Locales(Vec<String>),
}

/// Lifecycle of a query's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// No result yet.
    Pending,
    /// The last fetch failed.
    Error,
    Success,
}

/// Point-in-time view of one cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub status: QueryStatus,
    /// Last successful (or locally set) data. Kept when a later fetch fails.
    pub data: Option<CachedData>,
    pub error: Option<ApiError>,
    pub is_fetching: bool,
    pub is_stale: bool,
}

impl QueryState {
    /// No data yet and a fetch is running.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, QueryStatus::Pending) && self.is_fetching
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<CachedData, ApiError>>>;

/// A fetch whose result has not been stored yet.
struct InFlight {
    /// Monotonic id, compared against `CacheEntry::cancelled_through`
    id: u64,
    /// Joined by every reader of the same key
    future: SharedFetch,
}

#[derive(Default)]
struct CacheEntry {
    data: Option<CachedData>,
    error: Option<ApiError>,
    /// When `data` was last written
    updated_at: Option<Instant>,
    /// Set by invalidation, cleared by the next write
    invalidated: bool,
    in_flight: Option<InFlight>,
    /// Results of fetches with an id up to this one are discarded
    cancelled_through: u64,
}

impl CacheEntry {
    fn is_stale(&self, stale_time: Duration) -> bool {
        self.invalidated || self.updated_at.is_none_or(|at| at.elapsed() >= stale_time)
    }

    fn fresh_data(&self, stale_time: Duration) -> Option<&CachedData> {
        if self.is_stale(stale_time) { None } else { self.data.as_ref() }
    }

    fn store(&mut self, data: CachedData) {
        self.data = Some(data);
        self.error = None;
        self.updated_at = Some(Instant::now());
        self.invalidated = false;
    }

    fn state(&self, stale_time: Duration) -> QueryState {
        let status = if self.error.is_some() {
            QueryStatus::Error
        } else if self.data.is_some() {
            QueryStatus::Success
        } else {
            QueryStatus::Pending
        };
        QueryState {
            status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.in_flight.is_some(),
            is_stale: self.is_stale(stale_time),
        }
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("data", &self.data)
            .field("error", &self.error)
            .field("updated_at", &self.updated_at)
            .field("invalidated", &self.invalidated)
            .field("in_flight", &self.in_flight.as_ref().map(|f| f.id))
            .field("cancelled_through", &self.cancelled_through)
            .finish()
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<QueryKey, CacheEntry>,
    last_fetch_id: u64,
}

/// Query result cache.
///
/// All operations take the internal lock briefly; no lock is held while a
/// fetch is awaited.
#[derive(Debug, Default)]
pub struct QueryCache {
    state: Mutex<CacheState>,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `key`, fetching with `fetcher` unless a fresh result is cached.
    ///
    /// If a fetch for `key` is already running, its result is shared instead of
    /// starting another one. The result is stored unless the fetch was
    /// cancelled in the meantime.
    ///
    /// # Errors
    /// - [`QueryError::Api`] when the fetch fails
    /// - [`QueryError::Cancelled`] when the fetch was cancelled before it finished
    pub async fn fetch<F>(
        &self,
        key: QueryKey,
        stale_time: Duration,
        fetcher: F,
    ) -> Result<CachedData, QueryError>
    where
        F: FnOnce() -> BoxFuture<'static, Result<CachedData, ApiError>>,
    {
        let (fetch_id, future) = {
            let mut state = self.state.lock().await;
            let CacheState { entries, last_fetch_id } = &mut *state;
            let entry = entries.entry(key.clone()).or_default();

            if let Some(data) = entry.fresh_data(stale_time) {
                tracing::trace!(?key, "Serving cached data");
                return Ok(data.clone());
            }

            if let Some(in_flight) = &entry.in_flight {
                tracing::trace!(?key, fetch_id = in_flight.id, "Joining in-flight fetch");
                (in_flight.id, in_flight.future.clone())
            } else {
                *last_fetch_id += 1;
                let id = *last_fetch_id;
                let future = fetcher().shared();
                entry.in_flight = Some(InFlight { id, future: future.clone() });
                tracing::debug!(?key, fetch_id = id, "Starting fetch");
                (id, future)
            }
        };

        let result = future.await;

        let mut state = self.state.lock().await;
        let entry = state.entries.entry(key.clone()).or_default();

        if fetch_id <= entry.cancelled_through {
            tracing::debug!(?key, fetch_id, "Discarding result of cancelled fetch");
            return Err(QueryError::Cancelled);
        }

        // Only the first reader to finish stores the shared result.
        if entry.in_flight.as_ref().is_some_and(|in_flight| in_flight.id == fetch_id) {
            entry.in_flight = None;
            match &result {
                Ok(data) => entry.store(data.clone()),
                Err(error) => {
                    tracing::warn!(?key, %error, "Fetch failed");
                    entry.error = Some(error.clone());
                }
            }
        }

        result.map_err(QueryError::from)
    }

    /// Cached data for `key`, fresh or not.
    pub async fn get_query_data(&self, key: &QueryKey) -> Option<CachedData> {
        self.state.lock().await.entries.get(key).and_then(|entry| entry.data.clone())
    }

    /// Replaces the data for `key` and marks it fresh.
    pub async fn set_query_data(&self, key: QueryKey, data: CachedData) {
        tracing::trace!(?key, "Setting query data");
        self.state.lock().await.entries.entry(key).or_default().store(data);
    }

    /// Edits the data for `key` in place and marks it fresh.
    ///
    /// Returns `false` (and does nothing) when nothing is cached for `key`.
    pub async fn update_query_data<F>(&self, key: &QueryKey, update: F) -> bool
    where
        F: FnOnce(&mut CachedData),
    {
        let mut state = self.state.lock().await;
        let Some(entry) = state.entries.get_mut(key) else {
            return false;
        };
        let Some(mut data) = entry.data.take() else {
            return false;
        };
        update(&mut data);
        entry.store(data);
        true
    }

    /// Drops the data for `key`, returning it. A running fetch is left alone.
    pub async fn remove_query_data(&self, key: &QueryKey) -> Option<CachedData> {
        let mut state = self.state.lock().await;
        let entry = state.entries.get_mut(key)?;
        entry.updated_at = None;
        entry.data.take()
    }

    /// Cancels running fetches in `scope`. Their results will not be stored.
    ///
    /// Returns the number of fetches cancelled.
    pub async fn cancel_queries(&self, scope: &QueryScope) -> usize {
        let mut state = self.state.lock().await;
        let mut cancelled = 0;
        for (key, entry) in state.entries.iter_mut().filter(|(key, _)| scope.matches(key)) {
            if let Some(in_flight) = entry.in_flight.take() {
                tracing::debug!(?key, fetch_id = in_flight.id, "Cancelled fetch");
                entry.cancelled_through = in_flight.id;
                cancelled += 1;
            }
        }
        cancelled
    }

    /// Marks every entry in `scope` stale so the next read refetches.
    ///
    /// Returns the number of entries marked.
    pub async fn invalidate_queries(&self, scope: &QueryScope) -> usize {
        let mut state = self.state.lock().await;
        let mut invalidated = 0;
        for entry in state.entries.iter_mut().filter(|(key, _)| scope.matches(key)).map(|(_, e)| e)
        {
            entry.invalidated = true;
            invalidated += 1;
        }
        tracing::debug!(?scope, invalidated, "Invalidated queries");
        invalidated
    }

    /// State of `key`, judged fresh or stale against `stale_time`.
    pub async fn query_state(&self, key: &QueryKey, stale_time: Duration) -> QueryState {
        self.state.lock().await.entries.get(key).map_or(
            QueryState {
                status: QueryStatus::Pending,
                data: None,
                error: None,
                is_fetching: false,
                is_stale: true,
            },
            |entry| entry.state(stale_time),
        )
    }

    /// Drops every entry. Running fetches finish but are not stored.
    pub async fn clear(&self) {
        tracing::debug!("Clearing query cache");
        self.state.lock().await.entries.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{
        AtomicUsize,
        Ordering,
    };

    use googletest::prelude::*;
    use rstest::*;
    use tokio::sync::oneshot;

    use super::*;

    const STALE: Duration = Duration::from_secs(30);

    fn locales(codes: &[&str]) -> CachedData {
        CachedData::Locales(codes.iter().map(ToString::to_string).collect())
    }

    /// Fetcher that counts its calls and yields `codes` after `delay`.
    fn counting_fetcher(
        calls: &Arc<AtomicUsize>,
        codes: &'static [&'static str],
        delay: Duration,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<CachedData, ApiError>> + use<> {
        let calls = Arc::clone(calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(delay).await;
                Ok(locales(codes))
            }
            .boxed()
        }
    }

    async fn wait_until_fetching(cache: &QueryCache, key: &QueryKey) {
        while !cache.query_state(key, STALE).await.is_fetching {
            tokio::task::yield_now().await;
        }
    }

    #[rstest]
    #[tokio::test]
    async fn fresh_data_is_served_without_refetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .fetch(QueryKey::Locales, STALE, counting_fetcher(&calls, &["en"], Duration::ZERO))
            .await;
        let second = cache
            .fetch(QueryKey::Locales, STALE, counting_fetcher(&calls, &["fr"], Duration::ZERO))
            .await;

        assert_eq!(first, Ok(locales(&["en"])));
        assert_eq!(second, Ok(locales(&["en"])));
        assert_that!(calls.load(Ordering::SeqCst), eq(1));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn data_older_than_stale_time_is_refetched() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        cache
            .fetch(QueryKey::Locales, STALE, counting_fetcher(&calls, &["en"], Duration::ZERO))
            .await
            .unwrap();

        tokio::time::advance(STALE).await;
        let refreshed = cache
            .fetch(QueryKey::Locales, STALE, counting_fetcher(&calls, &["fr"], Duration::ZERO))
            .await;

        assert_eq!(refreshed, Ok(locales(&["fr"])));
        assert_that!(calls.load(Ordering::SeqCst), eq(2));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn concurrent_reads_share_one_fetch() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let delay = Duration::from_millis(300);

        let (a, b) = tokio::join!(
            cache.fetch(QueryKey::Locales, STALE, counting_fetcher(&calls, &["en"], delay)),
            cache.fetch(QueryKey::Locales, STALE, counting_fetcher(&calls, &["fr"], delay)),
        );

        assert_eq!(a, Ok(locales(&["en"])));
        assert_eq!(b, Ok(locales(&["en"])));
        assert_that!(calls.load(Ordering::SeqCst), eq(1));
        assert_that!(cache.query_state(&QueryKey::Locales, STALE).await.is_fetching, eq(false));
    }

    #[rstest]
    #[tokio::test]
    async fn invalidated_entry_is_refetched_on_next_read() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::TranslationSearch(crate::types::SearchFilters::default());
        cache.fetch(key.clone(), STALE, counting_fetcher(&calls, &["en"], Duration::ZERO)).await.unwrap();

        let marked = cache.invalidate_queries(&QueryScope::Searches).await;

        assert_that!(marked, eq(1));
        assert_that!(cache.query_state(&key, STALE).await.is_stale, eq(true));
        // Stale data is still readable until the refetch.
        assert_eq!(cache.get_query_data(&key).await, Some(locales(&["en"])));

        let refreshed = cache.fetch(key.clone(), STALE, counting_fetcher(&calls, &["fr"], Duration::ZERO)).await;

        assert_eq!(refreshed, Ok(locales(&["fr"])));
        assert_that!(cache.query_state(&key, STALE).await.is_stale, eq(false));
    }

    #[rstest]
    #[tokio::test]
    async fn invalidation_outside_scope_keeps_entry_fresh() {
        let cache = QueryCache::new();
        cache.set_query_data(QueryKey::Locales, locales(&["en"])).await;

        let marked = cache.invalidate_queries(&QueryScope::TranslationTree).await;

        assert_that!(marked, eq(0));
        assert_that!(cache.query_state(&QueryKey::Locales, STALE).await.is_stale, eq(false));
    }

    #[rstest]
    #[tokio::test]
    async fn cancelled_fetch_does_not_overwrite_cache() {
        let cache = Arc::new(QueryCache::new());
        let (release, gate) = oneshot::channel::<()>();
        let task = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move {
                cache
                    .fetch(QueryKey::Locales, STALE, move || {
                        async move {
                            let _ = gate.await;
                            Ok(locales(&["stale"]))
                        }
                        .boxed()
                    })
                    .await
            }
        });
        wait_until_fetching(&cache, &QueryKey::Locales).await;

        let cancelled = cache.cancel_queries(&QueryScope::Exact(QueryKey::Locales)).await;
        cache.set_query_data(QueryKey::Locales, locales(&["fresh"])).await;
        release.send(()).unwrap();

        assert_that!(cancelled, eq(1));
        assert_eq!(task.await.unwrap(), Err(QueryError::Cancelled));
        assert_eq!(cache.get_query_data(&QueryKey::Locales).await, Some(locales(&["fresh"])));
    }

    #[rstest]
    #[tokio::test]
    async fn cancel_without_running_fetch_is_noop() {
        let cache = QueryCache::new();
        cache.set_query_data(QueryKey::Locales, locales(&["en"])).await;

        assert_that!(cache.cancel_queries(&QueryScope::TranslationTree).await, eq(0));
        assert_that!(cache.cancel_queries(&QueryScope::Exact(QueryKey::Locales)).await, eq(0));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_fetch_keeps_previous_data() {
        let cache = QueryCache::new();
        cache.set_query_data(QueryKey::Locales, locales(&["en"])).await;
        cache.invalidate_queries(&QueryScope::Exact(QueryKey::Locales)).await;

        let result = cache
            .fetch(QueryKey::Locales, STALE, || async { Err(ApiError::Timeout) }.boxed())
            .await;

        assert_eq!(result, Err(QueryError::Api(ApiError::Timeout)));
        let state = cache.query_state(&QueryKey::Locales, STALE).await;
        assert_that!(state.status, eq(QueryStatus::Error));
        assert_eq!(state.data, Some(locales(&["en"])));
        assert_eq!(state.error, Some(ApiError::Timeout));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_key_is_pending() {
        let cache = QueryCache::new();

        let state = cache.query_state(&QueryKey::Translations, STALE).await;

        assert_that!(state.status, eq(QueryStatus::Pending));
        assert_that!(state.is_loading(), eq(false));
        assert_that!(state.is_stale, eq(true));
    }

    #[rstest]
    #[tokio::test]
    async fn update_query_data_requires_existing_data() {
        let cache = QueryCache::new();

        let updated = cache.update_query_data(&QueryKey::Locales, |_| {}).await;

        assert_that!(updated, eq(false));
        assert_that!(cache.get_query_data(&QueryKey::Locales).await, none());
    }

    #[rstest]
    #[tokio::test]
    async fn update_query_data_edits_in_place() {
        let cache = QueryCache::new();
        cache.set_query_data(QueryKey::Locales, locales(&["en"])).await;

        let updated = cache
            .update_query_data(&QueryKey::Locales, |data| {
                if let CachedData::Locales(codes) = data {
                    codes.push("fr".to_string());
                }
            })
            .await;

        assert_that!(updated, eq(true));
        assert_eq!(cache.get_query_data(&QueryKey::Locales).await, Some(locales(&["en", "fr"])));
    }

    #[rstest]
    #[tokio::test]
    async fn removed_data_reads_as_pending() {
        let cache = QueryCache::new();
        cache.set_query_data(QueryKey::Locales, locales(&["en"])).await;

        let removed = cache.remove_query_data(&QueryKey::Locales).await;

        assert_eq!(removed, Some(locales(&["en"])));
        let state = cache.query_state(&QueryKey::Locales, STALE).await;
        assert_that!(state.status, eq(QueryStatus::Pending));
        assert_that!(state.is_stale, eq(true));
    }

    #[rstest]
    #[tokio::test]
    async fn clear_drops_everything() {
        let cache = QueryCache::new();
        cache.set_query_data(QueryKey::Locales, locales(&["en"])).await;

        cache.clear().await;

        assert_that!(cache.get_query_data(&QueryKey::Locales).await, none());
    }
}
