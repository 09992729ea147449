use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    ApiError,
    TranslationApi,
    sample_translations,
};
use crate::config::LatencyConfig;
use crate::search;
use crate::types::{
    SearchFilters,
    TranslationKey,
    UpdateTranslationRequest,
    now_timestamp,
};

/// Simulated round-trip time per kind of call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency {
    pub search: Duration,
    pub update: Duration,
    pub detail: Duration,
    pub locales: Duration,
}

impl Latency {
    /// No delay at all.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            search: Duration::ZERO,
            update: Duration::ZERO,
            detail: Duration::ZERO,
            locales: Duration::ZERO,
        }
    }
}

impl From<&LatencyConfig> for Latency {
    fn from(config: &LatencyConfig) -> Self {
        Self {
            search: Duration::from_millis(config.search_ms),
            update: Duration::from_millis(config.update_ms),
            detail: Duration::from_millis(config.detail_ms),
            locales: Duration::from_millis(config.locales_ms),
        }
    }
}

/// In-process stand-in for the remote translation API.
///
/// Clones share the same dataset.
#[derive(Debug, Clone)]
pub struct InMemoryTranslationApi {
    /// Dataset, in insertion order
    records: Arc<RwLock<Vec<TranslationKey>>>,
    /// Injected delays
    latency: Latency,
}

impl InMemoryTranslationApi {
    #[must_use]
    pub fn new(records: Vec<TranslationKey>, latency: Latency) -> Self {
        Self { records: Arc::new(RwLock::new(records)), latency }
    }

    /// Serves [`sample_translations`].
    #[must_use]
    pub fn with_sample_data(latency: Latency) -> Self {
        Self::new(sample_translations(), latency)
    }

    /// Copy of the current dataset, bypassing latency.
    pub async fn snapshot(&self) -> Vec<TranslationKey> {
        self.records.read().await.clone()
    }

    async fn delay(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

#[async_trait]
impl TranslationApi for InMemoryTranslationApi {
    async fn list(&self) -> Result<Vec<TranslationKey>, ApiError> {
        Self::delay(self.latency.search).await;
        Ok(self.records.read().await.clone())
    }

    async fn list_by_locale(&self, locale: &str) -> Result<Vec<TranslationKey>, ApiError> {
        Self::delay(self.latency.search).await;
        let records = self.records.read().await;
        Ok(search::search(&records, &SearchFilters::with_locale(locale)))
    }

    async fn get(&self, id: &str) -> Result<TranslationKey, ApiError> {
        Self::delay(self.latency.detail).await;
        self.records
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound { id: id.to_string() })
    }

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<TranslationKey>, ApiError> {
        Self::delay(self.latency.search).await;
        let records = self.records.read().await;
        let results = search::search(&records, filters);
        tracing::debug!(?filters, hits = results.len(), "Searched translations");
        Ok(results)
    }

    async fn locales(&self) -> Result<Vec<String>, ApiError> {
        Self::delay(self.latency.locales).await;
        Ok(search::available_locales(&self.records.read().await))
    }

    async fn update_translation(
        &self,
        request: &UpdateTranslationRequest,
        editor: &str,
    ) -> Result<TranslationKey, ApiError> {
        Self::delay(self.latency.update).await;

        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|item| item.id == request.id)
            .ok_or_else(|| ApiError::NotFound { id: request.id.clone() })?;

        let translation = record.translations.get_mut(&request.locale).ok_or_else(|| {
            ApiError::LocaleNotFound { id: request.id.clone(), locale: request.locale.clone() }
        })?;

        let now = now_timestamp();
        translation.value.clone_from(&request.data.value);
        translation.updated_at.clone_from(&now);
        translation.updated_by = editor.to_string();
        record.last_modified = now;

        tracing::debug!(id = %request.id, locale = %request.locale, "Translation updated");
        Ok(record.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::test_utils::ids;

    #[fixture]
    fn api() -> InMemoryTranslationApi {
        InMemoryTranslationApi::with_sample_data(Latency::none())
    }

    #[rstest]
    #[tokio::test]
    async fn search_runs_filter_engine(api: InMemoryTranslationApi) {
        let results = api.search(&SearchFilters::with_category("buttons")).await.unwrap();

        assert_that!(ids(&results), elements_are![eq("1"), eq("2")]);
    }

    #[rstest]
    #[tokio::test]
    async fn list_by_locale_skips_untranslated_keys(api: InMemoryTranslationApi) {
        let results = api.list_by_locale("en").await.unwrap();

        assert_that!(ids(&results), elements_are![eq("1"), eq("2"), eq("3")]);
    }

    #[rstest]
    #[tokio::test]
    async fn locales_cover_full_dataset(api: InMemoryTranslationApi) {
        assert_that!(api.locales().await.unwrap(), elements_are![eq("en"), eq("es"), eq("fr")]);
    }

    #[rstest]
    #[tokio::test]
    async fn get_unknown_id_is_not_found(api: InMemoryTranslationApi) {
        let result = api.get("missing").await;

        assert_eq!(result, Err(ApiError::NotFound { id: "missing".to_string() }));
    }

    #[rstest]
    #[tokio::test]
    async fn update_stamps_value_author_and_record(api: InMemoryTranslationApi) {
        let request = UpdateTranslationRequest::new("1", "en", "Save changes");

        let updated = api.update_translation(&request, "current@user.com").await.unwrap();

        let en = updated.translation("en").unwrap();
        assert_that!(en.value, eq("Save changes"));
        assert_that!(en.updated_by, eq("current@user.com"));
        assert_eq!(updated.last_modified, en.updated_at);
        assert_eq!(api.get("1").await.unwrap(), updated);
    }

    #[rstest]
    #[tokio::test]
    async fn update_unknown_id_leaves_dataset_unchanged(api: InMemoryTranslationApi) {
        let before = api.snapshot().await;
        let request = UpdateTranslationRequest::new("99", "en", "Save");

        let error = api.update_translation(&request, "current@user.com").await.unwrap_err();

        assert_that!(error.to_string(), eq("Translation with id 99 not found"));
        assert_eq!(api.snapshot().await, before);
    }

    #[rstest]
    #[tokio::test]
    async fn update_missing_locale_is_rejected(api: InMemoryTranslationApi) {
        let request = UpdateTranslationRequest::new("4", "en", "Welcome!");

        let error = api.update_translation(&request, "current@user.com").await.unwrap_err();

        assert_that!(error.to_string(), eq("Locale en not found for translation 4"));
        assert_that!(api.get("4").await.unwrap().has_translations(), eq(false));
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn latency_is_applied() {
        let api = InMemoryTranslationApi::with_sample_data(Latency {
            search: Duration::from_millis(300),
            ..Latency::none()
        });
        let started = tokio::time::Instant::now();

        api.list().await.unwrap();

        assert_that!(started.elapsed() >= Duration::from_millis(300), eq(true));
    }

    #[rstest]
    fn latency_from_config() {
        let config = LatencyConfig { search_ms: 300, update_ms: 250, detail_ms: 100, locales_ms: 200 };

        let latency = Latency::from(&config);

        assert_that!(latency.update, eq(Duration::from_millis(250)));
        assert_that!(latency.locales, eq(Duration::from_millis(200)));
    }
}
