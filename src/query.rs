//! Query layer: cached, single-flight reads of the translation dataset.
//!
//! Results are cached per [`QueryKey`]. A cached result is served while it is
//! fresh; once it is stale (by age or by invalidation) the next read refetches.
//! Concurrent reads of the same key share one fetch.

mod cache;
mod client;
mod error;
mod keys;

pub use cache::{
    CachedData,
    QueryCache,
    QueryState,
    QueryStatus,
};
pub use client::QueryClient;
pub use error::QueryError;
pub use keys::{
    QueryKey,
    QueryScope,
};
