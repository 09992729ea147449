//! 翻訳キー管理セッションのデモ
//!
//! 使用方法:
//! ```
//! cargo run --example session -- /path/to/workspace "search query"
//! ```
//!
//! ワークスペースに `.translation-manager.json` があれば読み込みます。

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::sync::Arc;

use translation_key_manager::api::{
    InMemoryTranslationApi,
    Latency,
};
use translation_key_manager::config::ConfigManager;
use translation_key_manager::highlight::mark;
use translation_key_manager::view::KeyListView;
use translation_key_manager::Session;

#[tokio::main]
async fn main() {
    // tracing を初期化（INFO レベル）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let workspace = args.get(1).map(PathBuf::from);
    let query = args.get(2).cloned().unwrap_or_else(|| "save".to_string());

    let mut config_manager = ConfigManager::new();
    if let Err(error) = config_manager.load_settings(workspace) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
    let settings = config_manager.get_settings().clone();

    let api = InMemoryTranslationApi::with_sample_data(Latency::from(&settings.latency));
    let mut session = Session::start(settings, Arc::new(api));

    match session.locales().await {
        Ok(locales) => println!("Locales: {}", locales.join(", ")),
        Err(error) => eprintln!("Failed to load locales: {error}"),
    }

    session.store_mut().set_search_query(query.as_str());
    session.store_mut().toggle_key_expansion("1");
    if let Err(error) = session.search().await {
        eprintln!("Search failed: {error}");
    }
    let toolbar = session.toolbar().await;
    let chips: Vec<_> = toolbar.active_filters.iter().map(|chip| chip.label.as_str()).collect();
    println!("Active filters: {}", chips.join(", "));
    print_view(&session.view().await);

    println!();
    println!("=== Editing button.save (en) ===");
    let mut editor = match session.open_editor("1", "en").await {
        Ok(editor) => editor,
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    };
    editor.set_value("Save changes");
    match session.save(&mut editor).await {
        Ok(record) => println!("Saved at {}", record.last_modified),
        Err(error) => eprintln!("Save failed: {}", error.user_message()),
    }

    if let Err(error) = session.search().await {
        eprintln!("Search failed: {error}");
    }
    print_view(&session.view().await);

    session.reset().await;
}

fn print_view(view: &KeyListView) {
    match view {
        KeyListView::Loading => println!("Loading translations..."),
        KeyListView::Error(message) | KeyListView::Empty(message) => println!("{message}"),
        KeyListView::Rows(rows) => {
            for row in rows {
                let chips: Vec<&str> = row.locale_chips.iter().map(|c| c.label.as_str()).collect();
                println!(
                    "{} [{}] {}",
                    mark(&row.key, "*", "*"),
                    mark(&row.category_label, "*", "*"),
                    if row.has_translations { chips.join(" ") } else { "No translations available".to_string() },
                );
                for cell in &row.cells {
                    println!("    {}: {}", cell.locale, mark(&cell.value, "*", "*"));
                }
            }
        }
    }
}
