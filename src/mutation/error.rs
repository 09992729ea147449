use thiserror::Error;

use crate::api::ApiError;
use crate::schema::{
    ValidationError,
    first_message,
    format_validation_errors,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// The request was rejected before anything was sent
    #[error("Invalid update:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),

    /// The data source rejected the update; the cache was rolled back
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The task running the update stopped before it finished
    #[error("Translation update was interrupted: {0}")]
    Interrupted(String),

    #[error("Cannot {operation} an update that is {phase}")]
    InvalidPhase { operation: &'static str, phase: &'static str },
}

impl MutationError {
    /// One-line message suitable for showing next to the edited field.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => first_message(errors).to_string(),
            other => other.to_string(),
        }
    }
}
