use super::MutationError;
use crate::query::{
    CachedData,
    QueryCache,
    QueryKey,
    QueryScope,
};
use crate::types::{
    TranslationKey,
    UpdateTranslationRequest,
    now_timestamp,
};

/// Timestamp and author written into the optimistic record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditStamp {
    pub updated_at: String,
    pub updated_by: String,
}

impl EditStamp {
    /// Stamps an edit by `editor` at the current time.
    #[must_use]
    pub fn now(editor: impl Into<String>) -> Self {
        Self { updated_at: now_timestamp(), updated_by: editor.into() }
    }
}

/// Where an [`OptimisticUpdate`] is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePhase {
    Idle,
    /// Applied to the cache, waiting for the data source.
    Pending {
        /// Record cached before the patch, if any
        snapshot: Option<TranslationKey>,
    },
    Committed,
    RolledBack,
}

impl UpdatePhase {
    const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending { .. } => "pending",
            Self::Committed => "committed",
            Self::RolledBack => "rolled back",
        }
    }
}

/// One optimistic edit of a cached translation record.
///
/// `Idle → Pending → Committed | RolledBack`, then [`settle`](Self::settle).
#[derive(Debug)]
pub struct OptimisticUpdate {
    request: UpdateTranslationRequest,
    phase: UpdatePhase,
}

impl OptimisticUpdate {
    #[must_use]
    pub const fn new(request: UpdateTranslationRequest) -> Self {
        Self { request, phase: UpdatePhase::Idle }
    }

    #[must_use]
    pub const fn request(&self) -> &UpdateTranslationRequest {
        &self.request
    }

    #[must_use]
    pub const fn phase(&self) -> &UpdatePhase {
        &self.phase
    }

    fn key(&self) -> QueryKey {
        QueryKey::Translation(self.request.id.clone())
    }

    fn invalid(&self, operation: &'static str) -> MutationError {
        MutationError::InvalidPhase { operation, phase: self.phase.name() }
    }

    /// Patches the cached record and remembers what was there before.
    ///
    /// Running fetches of the record are cancelled first so they cannot
    /// overwrite the patch. A record that is not cached, or has no entry for
    /// the locale, is left as is.
    ///
    /// # Errors
    /// [`MutationError::InvalidPhase`] unless idle.
    pub async fn apply(&mut self, cache: &QueryCache, stamp: &EditStamp) -> Result<(), MutationError> {
        if self.phase != UpdatePhase::Idle {
            return Err(self.invalid("apply"));
        }

        let key = self.key();
        cache.cancel_queries(&QueryScope::Exact(key.clone())).await;

        let snapshot = match cache.get_query_data(&key).await {
            Some(CachedData::Key(record)) => Some(record),
            _ => None,
        };

        let locale = &self.request.locale;
        if snapshot.as_ref().is_some_and(|record| record.has_locale(locale)) {
            cache
                .update_query_data(&key, |data| {
                    if let CachedData::Key(record) = data
                        && let Some(translation) = record.translations.get_mut(locale)
                    {
                        translation.value.clone_from(&self.request.data.value);
                        translation.updated_at.clone_from(&stamp.updated_at);
                        translation.updated_by.clone_from(&stamp.updated_by);
                    }
                })
                .await;
            tracing::debug!(id = %self.request.id, %locale, "Applied optimistic update");
        } else {
            tracing::debug!(id = %self.request.id, %locale, "Nothing cached to patch");
        }

        self.phase = UpdatePhase::Pending { snapshot };
        Ok(())
    }

    /// Caches the record confirmed by the data source.
    ///
    /// # Errors
    /// [`MutationError::InvalidPhase`] unless pending.
    pub async fn commit(
        &mut self,
        cache: &QueryCache,
        confirmed: TranslationKey,
    ) -> Result<(), MutationError> {
        if !matches!(self.phase, UpdatePhase::Pending { .. }) {
            return Err(self.invalid("commit"));
        }
        cache.set_query_data(self.key(), CachedData::Key(confirmed)).await;
        self.phase = UpdatePhase::Committed;
        Ok(())
    }

    /// Puts back the record cached before [`apply`](Self::apply).
    ///
    /// # Errors
    /// [`MutationError::InvalidPhase`] unless pending.
    pub async fn rollback(&mut self, cache: &QueryCache) -> Result<(), MutationError> {
        let snapshot = match &mut self.phase {
            UpdatePhase::Pending { snapshot } => snapshot.take(),
            _ => return Err(self.invalid("roll back")),
        };
        let key = self.key();
        match snapshot {
            Some(previous) => cache.set_query_data(key, CachedData::Key(previous)).await,
            None => {
                cache.remove_query_data(&key).await;
            }
        }
        tracing::debug!(
            id = %self.request.id,
            locale = %self.request.locale,
            "Rolled back optimistic update"
        );
        self.phase = UpdatePhase::RolledBack;
        Ok(())
    }

    /// Marks the record, every list and every search stale.
    ///
    /// # Errors
    /// [`MutationError::InvalidPhase`] unless committed or rolled back.
    pub async fn settle(&self, cache: &QueryCache) -> Result<(), MutationError> {
        if !matches!(self.phase, UpdatePhase::Committed | UpdatePhase::RolledBack) {
            return Err(self.invalid("settle"));
        }
        cache.invalidate_queries(&QueryScope::Exact(self.key())).await;
        cache.invalidate_queries(&QueryScope::TranslationTree).await;
        cache.invalidate_queries(&QueryScope::Searches).await;
        Ok(())
    }
}
