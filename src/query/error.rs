use thiserror::Error;

use super::QueryKey;
use crate::api::ApiError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The data source rejected the request
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The fetch was cancelled before its result could be stored
    #[error("Query was cancelled")]
    Cancelled,
    /// The cache holds a different kind of data under this key
    #[error("Cached data for {0:?} has an unexpected shape")]
    UnexpectedData(QueryKey),
}
