//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    ManagerSettings,
    loader,
};

/// 設定管理を行う
///
/// 読み込んだ設定は常にバリデーション済み。失敗した読み込みや更新は
/// 現在の設定に影響しない。
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: ManagerSettings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,

    /// 設定の読み込み元ファイル（デフォルト値の場合は `None`）
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// デフォルト設定で作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ワークスペースの設定を読み込む
    ///
    /// `workspace_root` が `None`、または設定ファイルが見つからない場合はデフォルト値。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let (config_path, settings) = match workspace_root.as_deref() {
            Some(root) => Self::read(root)?,
            None => (None, ManagerSettings::default()),
        };

        self.apply(settings)?;
        self.workspace_root = workspace_root;
        self.config_path = config_path;
        tracing::debug!(config_path = ?self.config_path, "Settings loaded");

        Ok(())
    }

    /// 前回と同じワークスペースから設定を読み直す
    ///
    /// # Errors
    /// [`load_settings`](Self::load_settings) と同じ
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_settings(self.workspace_root.clone())
    }

    /// 設定を更新する
    ///
    /// # Errors
    /// バリデーションエラー（現在の設定は変更されない）
    pub fn update_settings(&mut self, new_settings: ManagerSettings) -> Result<(), ConfigError> {
        self.apply(new_settings)?;
        tracing::debug!("Settings updated");
        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &ManagerSettings {
        &self.current_settings
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// 設定の読み込み元ファイルを取得
    #[must_use]
    pub const fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    fn read(root: &Path) -> Result<(Option<PathBuf>, ManagerSettings), ConfigError> {
        Ok(loader::load_from_workspace(root)?
            .map_or_else(|| (None, ManagerSettings::default()), |(path, settings)| (Some(path), settings)))
    }

    fn apply(&mut self, settings: ManagerSettings) -> Result<(), ConfigError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        self.current_settings = settings;
        Ok(())
    }
}
