//! Edits with optimistic cache updates.
//!
//! An edit is shown in the cache before the data source confirms it. On
//! success the confirmed record replaces the optimistic one; on failure the
//! previous record is restored. Either way the affected queries are
//! invalidated afterwards so the next read sees the source of truth.

mod error;
mod optimistic;
mod update;

pub use error::MutationError;
pub use optimistic::{
    EditStamp,
    OptimisticUpdate,
    UpdatePhase,
};
pub use update::{
    MutationStatus,
    UpdateTranslationMutation,
};
