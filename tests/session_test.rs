//! 翻訳キー管理セッションの結合テスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use translation_key_manager::api::{
    ApiError,
    InMemoryTranslationApi,
    Latency,
};
use translation_key_manager::config::{
    CONFIG_FILE_NAME,
    ConfigManager,
    ManagerSettings,
};
use translation_key_manager::mutation::{
    MutationError,
    MutationStatus,
};
use translation_key_manager::query::{
    CachedData,
    QueryKey,
};
use translation_key_manager::view::KeyListView;
use translation_key_manager::{
    Session,
    TranslationKey,
    UpdateTranslationRequest,
};

fn start(settings: ManagerSettings) -> (InMemoryTranslationApi, Session) {
    let api = InMemoryTranslationApi::with_sample_data(Latency::from(&settings.latency));
    let session = Session::start(settings, Arc::new(api.clone()));
    (api, session)
}

async fn cached_record(session: &Session, id: &str) -> TranslationKey {
    match session.client().cache().get_query_data(&QueryKey::Translation(id.to_string())).await {
        Some(CachedData::Key(record)) => record,
        other => panic!("expected a cached record, got {other:?}"),
    }
}

fn keys(records: &[TranslationKey]) -> Vec<&str> {
    records.iter().map(|record| record.key.as_str()).collect()
}

/// 検索結果はストアのフィルタに従い、一覧ビューに反映される
#[tokio::test(start_paused = true)]
async fn test_search_and_view_follow_store() {
    let (_, mut session) = start(ManagerSettings::default());
    session.store_mut().set_selected_category(Some("buttons".to_string()));
    session.store_mut().toggle_key_expansion("2");

    let results = session.search().await.unwrap();

    assert_eq!(keys(&results), vec!["button.save", "button.cancel"]);
    let KeyListView::Rows(rows) = session.view().await else {
        panic!("expected rows");
    };
    assert_eq!(rows.len(), 2);
    assert!(!rows[0].is_expanded);
    assert!(rows[1].is_expanded);
    assert_eq!(rows[1].cells.len(), 3);
}

/// 楽観的更新はサーバーの応答より先にキャッシュに見える
#[tokio::test(start_paused = true)]
async fn test_optimistic_value_visible_while_pending() {
    let (api, mut session) = start(ManagerSettings::default());
    let editor = session.open_editor("1", "en").await.unwrap();
    assert_eq!(editor.value(), "Save");

    let mutation = session.mutation().clone();
    let task = tokio::spawn(async move {
        mutation.mutate(UpdateTranslationRequest::new("1", "en", "Save now")).await
    });
    tokio::time::sleep(Duration::from_millis(100)).await;

    let pending = cached_record(&session, "1").await;
    assert_eq!(pending.translation("en").unwrap().value, "Save now");
    assert_eq!(pending.translation("en").unwrap().updated_by, "current@user.com");
    assert!(session.mutation().status().await.is_pending());
    assert_eq!(api.snapshot().await[0].translation("en").unwrap().value, "Save");

    let confirmed = task.await.unwrap().unwrap();

    assert_eq!(api.snapshot().await[0], confirmed);
    assert_eq!(session.client().translation("1").await.unwrap(), confirmed);
}

/// 存在しないロケールへの更新は拒否され、キャッシュとデータセットは元のまま
#[tokio::test(start_paused = true)]
async fn test_update_of_missing_locale_rolls_back() {
    let (api, mut session) = start(ManagerSettings::default());
    let before = api.snapshot().await;
    let mut editor = session.open_editor("1", "de").await.unwrap();
    assert_eq!(editor.value(), "");
    editor.set_value("Speichern");

    let result = session.save(&mut editor).await;

    assert_eq!(
        result,
        Err(MutationError::Api(ApiError::LocaleNotFound {
            id: "1".to_string(),
            locale: "de".to_string()
        }))
    );
    assert_eq!(editor.submit_error(), Some("Locale de not found for translation 1"));
    assert!(session.store().is_editing("1", "de"));
    assert_eq!(cached_record(&session, "1").await, before[0]);
    assert_eq!(api.snapshot().await, before);
    assert_eq!(
        session.mutation().status().await,
        MutationStatus::Error("Locale de not found for translation 1".to_string())
    );
}

/// ワークスペースの設定ファイルで編集者とレイテンシを指定できる
#[tokio::test(start_paused = true)]
async fn test_workspace_settings_drive_session() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        r#"{"currentUser": "translator@example.com", "latency": {"updateMs": 1000}}"#,
    )
    .unwrap();
    let mut manager = ConfigManager::new();
    manager.load_settings(Some(temp_dir.path().to_path_buf())).unwrap();
    let (_, mut session) = start(manager.get_settings().clone());

    let mut editor = session.open_editor("3", "fr").await.unwrap();
    editor.set_value("Adresse électronique");
    let started = tokio::time::Instant::now();
    let record = session.save(&mut editor).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(1000));
    let fr = record.translation("fr").unwrap();
    assert_eq!(fr.value, "Adresse électronique");
    assert_eq!(fr.updated_by, "translator@example.com");
    assert!(!session.store().is_editing("3", "fr"));
}

/// ログアウト時にセッション状態がすべて破棄される
#[tokio::test(start_paused = true)]
async fn test_reset_discards_session_state() {
    let (_, mut session) = start(ManagerSettings::default());
    session.store_mut().set_search_query("email");
    session.search().await.unwrap();
    assert!(matches!(session.view().await, KeyListView::Rows(_)));

    session.reset().await;

    assert_eq!(session.view().await, KeyListView::Loading);
    assert!(!session.store().has_active_filters());
}
