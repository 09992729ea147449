use async_trait::async_trait;

use super::ApiError;
use crate::types::{
    SearchFilters,
    TranslationKey,
    UpdateTranslationRequest,
};

/// Call/response access to the translation dataset.
///
/// The query layer only talks to this trait, so a remote backend, the in-memory
/// mock or a test double can stand behind it.
#[async_trait]
pub trait TranslationApi: Send + Sync {
    /// Every record, in dataset order.
    async fn list(&self) -> Result<Vec<TranslationKey>, ApiError>;

    /// Records that have a translation for `locale`.
    async fn list_by_locale(&self, locale: &str) -> Result<Vec<TranslationKey>, ApiError>;

    /// One record.
    ///
    /// # Errors
    /// [`ApiError::NotFound`] when no record has this id.
    async fn get(&self, id: &str) -> Result<TranslationKey, ApiError>;

    /// Records matching `filters`, in dataset order.
    async fn search(&self, filters: &SearchFilters) -> Result<Vec<TranslationKey>, ApiError>;

    /// Sorted locale codes present anywhere in the dataset.
    async fn locales(&self) -> Result<Vec<String>, ApiError>;

    /// Replaces the value of an existing `(id, locale)` translation.
    ///
    /// `editor` is recorded as the translation's author. Returns the full
    /// updated record.
    ///
    /// # Errors
    /// [`ApiError::NotFound`] or [`ApiError::LocaleNotFound`].
    async fn update_translation(
        &self,
        request: &UpdateTranslationRequest,
        editor: &str,
    ) -> Result<TranslationKey, ApiError>;
}
