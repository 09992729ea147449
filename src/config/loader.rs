//! 設定ファイルの探索と読み込み

use std::path::{
    Path,
    PathBuf,
};

use super::{
    CONFIG_FILE_NAME,
    ConfigError,
    ManagerSettings,
};

/// `start` から親ディレクトリへ向かって設定ファイルを探す
///
/// 最も近い `.translation-manager.json` のパスを返す。
pub(super) fn find_config_file(start: &Path) -> Option<PathBuf> {
    start.ancestors().map(|dir| dir.join(CONFIG_FILE_NAME)).find(|candidate| candidate.is_file())
}

/// 設定ファイルを読み込む
///
/// 省略されたフィールドはデフォルト値で補われる。検証は呼び出し側で行う。
pub(super) fn load_file(path: &Path) -> Result<ManagerSettings, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), "Loaded configuration file");
    Ok(settings)
}

/// ワークスペース（またはその祖先）の設定を読み込む
///
/// # Returns
/// - `Ok(Some((path, settings)))`: 設定ファイルが見つかった
/// - `Ok(None)`: どこにも設定ファイルがない
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<(PathBuf, ManagerSettings)>, ConfigError> {
    let Some(path) = find_config_file(workspace_root) else {
        tracing::debug!(root = %workspace_root.display(), "No configuration file found");
        return Ok(None);
    };
    let settings = load_file(&path)?;
    Ok(Some((path, settings)))
}
