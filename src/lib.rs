//! translation-key-manager
//!
//! 複数ロケールの翻訳キーを検索・絞り込みし、楽観的更新で編集するためのコアライブラリ

pub mod api;
pub mod config;
pub mod editor;
pub mod highlight;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod search;
pub mod session;
pub mod store;
pub mod types;
pub mod view;

mod test_utils;

// よく使う型を再エクスポート
pub use api::{
    ApiError,
    InMemoryTranslationApi,
    TranslationApi,
};
pub use session::Session;
pub use types::{
    SearchFilters,
    Translation,
    TranslationKey,
    UpdateTranslationRequest,
};
