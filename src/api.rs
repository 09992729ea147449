//! Data source for translation keys.
/// Data source errors
mod error;
/// In-memory data source with injected latency
mod memory;
/// Demo dataset
mod sample;
/// Data source trait
mod source;

pub use error::ApiError;
pub use memory::{
    InMemoryTranslationApi,
    Latency,
};
pub use sample::sample_translations;
pub use source::TranslationApi;
