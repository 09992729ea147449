//! Inline editing of one `(translation id, locale)` value.

use crate::mutation::{
    MutationError,
    UpdateTranslationMutation,
};
use crate::schema::{
    first_message,
    validate_update,
};
use crate::store::UiStore;
use crate::types::{
    TranslationKey,
    UpdateTranslationRequest,
};

/// Draft value of an open editor together with its inline messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    translation_id: String,
    locale: String,
    /// Value the editor was opened with; restored on cancel.
    original_value: String,
    value: String,
    validation_error: Option<String>,
    /// Message of the last failed save.
    submit_error: Option<String>,
}

impl EditorSession {
    #[must_use]
    pub fn new(
        translation_id: impl Into<String>,
        locale: impl Into<String>,
        current_value: impl Into<String>,
    ) -> Self {
        let current_value = current_value.into();
        Self {
            translation_id: translation_id.into(),
            locale: locale.into(),
            value: current_value.clone(),
            original_value: current_value,
            validation_error: None,
            submit_error: None,
        }
    }

    #[must_use]
    pub fn translation_id(&self) -> &str {
        &self.translation_id
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    #[must_use]
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    /// Replaces the draft and re-validates it.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.validation_error = validate_update(&self.request())
            .err()
            .map(|errors| first_message(&errors).to_string());
    }

    #[must_use]
    pub const fn can_save(&self) -> bool {
        self.validation_error.is_none()
    }

    /// Sends the draft. Closes the editor in `store` once the update is
    /// confirmed, unless the store has moved on to another cell.
    ///
    /// On failure the editor stays open and the message is kept in
    /// [`submit_error`](Self::submit_error).
    ///
    /// # Errors
    /// [`MutationError`] from validation or from the data source.
    pub async fn save(
        &mut self,
        store: &mut UiStore,
        mutation: &UpdateTranslationMutation,
    ) -> Result<TranslationKey, MutationError> {
        let request = self.validate()?;
        self.submit_error = None;

        match mutation.mutate(request).await {
            Ok(record) => {
                if store.is_editing(&self.translation_id, &self.locale) {
                    store.close_editor();
                }
                Ok(record)
            }
            Err(error) => {
                tracing::debug!(
                    id = %self.translation_id,
                    locale = %self.locale,
                    %error,
                    "Failed to save translation"
                );
                self.submit_error = Some(error.user_message());
                Err(error)
            }
        }
    }

    /// Drops the draft and closes the editor.
    pub fn cancel(&mut self, store: &mut UiStore) {
        self.value.clone_from(&self.original_value);
        self.validation_error = None;
        self.submit_error = None;
        store.close_editor();
    }

    /// Re-seeds the editor after the underlying value changed elsewhere.
    pub fn reset_to(&mut self, current_value: impl Into<String>) {
        self.original_value = current_value.into();
        self.value.clone_from(&self.original_value);
        self.validation_error = None;
    }

    fn request(&self) -> UpdateTranslationRequest {
        UpdateTranslationRequest::new(&*self.translation_id, &*self.locale, &*self.value)
    }

    fn validate(&mut self) -> Result<UpdateTranslationRequest, MutationError> {
        let request = self.request();
        match validate_update(&request) {
            Ok(()) => {
                self.validation_error = None;
                Ok(request)
            }
            Err(errors) => {
                self.validation_error = Some(first_message(&errors).to_string());
                Err(MutationError::Validation(errors))
            }
        }
    }
}
