use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{
    Mutex,
    RwLock,
};

use super::{
    EditStamp,
    MutationError,
    OptimisticUpdate,
};
use crate::query::QueryClient;
use crate::schema::validate_update;
use crate::types::{
    TranslationKey,
    UpdateTranslationRequest,
};

/// One lock per translation id with an update running.
type IdLocks = Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>;

/// Outcome of the most recent [`UpdateTranslationMutation::mutate`] call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Success(TranslationKey),
    /// User-facing message
    Error(String),
}

impl MutationStatus {
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Updates one translation value through the optimistic protocol.
///
/// Clones share their status and their per-id locks, so a caller can watch a
/// mutation that runs on another task.
#[derive(Debug, Clone)]
pub struct UpdateTranslationMutation {
    client: QueryClient,
    /// Recorded as the author of every edit
    current_user: String,
    status: Arc<RwLock<MutationStatus>>,
    in_flight: IdLocks,
}

impl UpdateTranslationMutation {
    #[must_use]
    pub fn new(client: QueryClient, current_user: impl Into<String>) -> Self {
        Self {
            client,
            current_user: current_user.into(),
            status: Arc::default(),
            in_flight: Arc::default(),
        }
    }

    pub async fn status(&self) -> MutationStatus {
        self.status.read().await.clone()
    }

    /// Back to [`MutationStatus::Idle`].
    pub async fn reset(&self) {
        self.set_status(MutationStatus::Idle).await;
    }

    async fn set_status(&self, status: MutationStatus) {
        *self.status.write().await = status;
    }

    /// Validates `request`, shows it in the cache, sends it and settles the
    /// cache with the outcome.
    ///
    /// The update runs on its own task. Dropping the returned future does not
    /// stop it: the cache is still committed or rolled back and then settled.
    /// Updates of the same id run one after another, so each one snapshots
    /// a value that is not another update's unconfirmed patch.
    ///
    /// # Errors
    /// - [`MutationError::Validation`] if the value is empty. Nothing is sent.
    /// - [`MutationError::Api`] if the data source rejects the update. The
    ///   cached record is restored.
    /// - [`MutationError::Interrupted`] if the update task died.
    pub async fn mutate(
        &self,
        request: UpdateTranslationRequest,
    ) -> Result<TranslationKey, MutationError> {
        if let Err(errors) = validate_update(&request) {
            let error = MutationError::Validation(errors);
            self.set_status(MutationStatus::Error(error.user_message())).await;
            return Err(error);
        }

        let task = tokio::spawn(self.clone().run(request));
        task.await.unwrap_or_else(|error| {
            tracing::error!(%error, "Translation update task failed");
            Err(MutationError::Interrupted(error.to_string()))
        })
    }

    async fn run(self, request: UpdateTranslationRequest) -> Result<TranslationKey, MutationError> {
        let id = request.id.clone();
        let id_lock = self.lock_for(&id).await;

        let serialized = id_lock.lock().await;
        self.set_status(MutationStatus::Pending).await;
        let outcome = self.send(request).await;
        self.set_status(match &outcome {
            Ok(record) => MutationStatus::Success(record.clone()),
            Err(error) => MutationStatus::Error(error.user_message()),
        })
        .await;
        drop(serialized);

        self.release(&id, &id_lock).await;
        outcome
    }

    async fn send(&self, request: UpdateTranslationRequest) -> Result<TranslationKey, MutationError> {
        tracing::debug!(id = %request.id, locale = %request.locale, "Updating translation");

        let cache = self.client.cache();
        let mut update = OptimisticUpdate::new(request);
        update.apply(cache, &EditStamp::now(&self.current_user)).await?;

        let response =
            self.client.api().update_translation(update.request(), &self.current_user).await;
        let outcome = match response {
            Ok(confirmed) => {
                update.commit(cache, confirmed.clone()).await?;
                Ok(confirmed)
            }
            Err(error) => {
                tracing::warn!(
                    id = %update.request().id,
                    locale = %update.request().locale,
                    %error,
                    "Translation update failed"
                );
                update.rollback(cache).await?;
                Err(MutationError::Api(error))
            }
        };

        update.settle(cache).await?;
        outcome
    }

    async fn lock_for(&self, id: &str) -> Arc<Mutex<()>> {
        Arc::clone(self.in_flight.lock().await.entry(id.to_string()).or_default())
    }

    /// Forgets the lock of `id` once no other update holds or waits for it.
    async fn release(&self, id: &str, id_lock: &Arc<Mutex<()>>) {
        let mut locks = self.in_flight.lock().await;
        // Only the registry and `id_lock` remain.
        if Arc::strong_count(id_lock) == 2 {
            locks.remove(id);
        }
    }
}
