//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のフィクスチャと API ダブルを提供します。
#![cfg(test)]

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::api::{
    ApiError,
    InMemoryTranslationApi,
    Latency,
    TranslationApi,
};
use crate::types::{
    SearchFilters,
    Translation,
    TranslationKey,
    UpdateTranslationRequest,
};

/// テスト用の Translation を作成する
pub(crate) fn translation(value: &str) -> Translation {
    Translation {
        value: value.to_string(),
        updated_at: "2024-01-15T10:00:00Z".to_string(),
        updated_by: "admin@example.com".to_string(),
    }
}

/// テスト用の TranslationKey を作成する
///
/// # Arguments
/// * `translations` - `(locale, value)` のペア
pub(crate) fn translation_key(
    id: &str,
    key: &str,
    category: &str,
    description: Option<&str>,
    translations: &[(&str, &str)],
) -> TranslationKey {
    TranslationKey {
        id: id.to_string(),
        key: key.to_string(),
        category: category.to_string(),
        description: description.map(ToString::to_string),
        created_at: "2024-01-15T10:00:00Z".to_string(),
        created_by: "admin@example.com".to_string(),
        last_modified: "2024-01-15T10:00:00Z".to_string(),
        translations: translations
            .iter()
            .map(|(locale, value)| ((*locale).to_string(), translation(value)))
            .collect(),
    }
}

/// キー名を `<category>.key<id>` とした TranslationKey を作成する
pub(crate) fn key_with_translations(
    id: &str,
    category: &str,
    translations: &[(&str, &str)],
) -> TranslationKey {
    translation_key(id, &format!("{category}.key{id}"), category, None, translations)
}

/// ボタン 1 件とフォーム 1 件（翻訳なし）のデータセット
pub(crate) fn buttons_and_forms() -> Vec<TranslationKey> {
    vec![
        translation_key(
            "test-1",
            "button.save",
            "buttons",
            Some("Save button text"),
            &[("en", "Save"), ("es", "Guardar")],
        ),
        translation_key("test-2", "form.email", "forms", Some("Email field label"), &[]),
    ]
}

/// 結果の ID を順番どおりに取り出す
pub(crate) fn ids(items: &[TranslationKey]) -> Vec<String> {
    items.iter().map(|item| item.id.clone()).collect()
}

/// 更新リクエストをゲートで止める API ダブル
///
/// `update_translation` は `entered` を通知した後、`release` が呼ばれるまで待機し、
/// その後サンプルデータに委譲するか `failure` を返します。
/// 楽観的更新の途中状態を観測するために使用します。
#[derive(Debug)]
pub(crate) struct GatedApi {
    inner: InMemoryTranslationApi,
    entered: Notify,
    gate: Notify,
    failure: Option<ApiError>,
}

impl GatedApi {
    /// サンプルデータに委譲するダブル
    pub(crate) fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryTranslationApi::with_sample_data(Latency::none()),
            entered: Notify::new(),
            gate: Notify::new(),
            failure: None,
        })
    }

    /// 更新を `error` で失敗させるダブル
    pub(crate) fn failing(error: ApiError) -> Arc<Self> {
        Arc::new(Self {
            inner: InMemoryTranslationApi::with_sample_data(Latency::none()),
            entered: Notify::new(),
            gate: Notify::new(),
            failure: Some(error),
        })
    }

    /// 更新リクエストが到着するまで待つ
    pub(crate) async fn wait_for_update(&self) {
        self.entered.notified().await;
    }

    /// 待機中の更新リクエストを進める
    pub(crate) fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl TranslationApi for GatedApi {
    async fn list(&self) -> Result<Vec<TranslationKey>, ApiError> {
        self.inner.list().await
    }

    async fn list_by_locale(&self, locale: &str) -> Result<Vec<TranslationKey>, ApiError> {
        self.inner.list_by_locale(locale).await
    }

    async fn get(&self, id: &str) -> Result<TranslationKey, ApiError> {
        self.inner.get(id).await
    }

    async fn search(&self, filters: &SearchFilters) -> Result<Vec<TranslationKey>, ApiError> {
        self.inner.search(filters).await
    }

    async fn locales(&self) -> Result<Vec<String>, ApiError> {
        self.inner.locales().await
    }

    async fn update_translation(
        &self,
        request: &UpdateTranslationRequest,
        editor: &str,
    ) -> Result<TranslationKey, ApiError> {
        self.entered.notify_one();
        self.gate.notified().await;
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => self.inner.update_translation(request, editor).await,
        }
    }
}
