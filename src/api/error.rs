use thiserror::Error;

/// Errors reported by a [`TranslationApi`](super::TranslationApi).
///
/// `Clone` so that one failed fetch can be handed to every caller sharing it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No record with this id
    #[error("Translation with id {id} not found")]
    NotFound { id: String },
    /// The record exists but has no value for this locale
    #[error("Locale {locale} not found for translation {id}")]
    LocaleNotFound { id: String, locale: String },
    /// The request did not reach the data source or the reply was lost
    #[error("Transport error: {0}")]
    Transport(String),
    /// The data source did not answer in time
    #[error("Request timed out")]
    Timeout,
}
