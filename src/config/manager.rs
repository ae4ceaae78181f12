//! 設定管理を行うモジュール

use std::path::PathBuf;

use serde_json::Value;

use super::{
    ConfigError,
    LocoSettings,
    loader,
};

/// クライアントから受け取る設定のセクション名
pub const SETTINGS_SECTION: &str = "locoI18n";

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: LocoSettings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: LocoSettings::default(), workspace_root: None }
    }

    /// 設定を読み込む
    ///
    /// ワークスペースの `.loco-i18n.json` を読み込み、クライアントの
    /// `initializationOptions` で上書きする。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(
        &mut self,
        workspace_root: Option<PathBuf>,
        client_options: Option<Value>,
    ) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        // ワークスペースの設定を読み込み
        let file_settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.map_or_else(LocoSettings::default, |ws| {
                tracing::debug!("Loaded workspace settings");
                ws
            })
        } else {
            LocoSettings::default()
        };

        // クライアント設定で上書き
        let settings = match client_options {
            Some(options) => {
                let mut merged = serde_json::to_value(&file_settings)?;
                merge_json(&mut merged, section(options));
                serde_json::from_value(merged)?
            }
            None => file_settings,
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を保存
        self.current_settings = settings;
        self.workspace_root = workspace_root;
        tracing::debug!(
            cache_mode = ?self.current_settings.cache_mode,
            function_name = %self.current_settings.t_function_name,
            "Settings loaded successfully"
        );

        Ok(())
    }

    /// クライアント設定の変更を反映する（`did_change_configuration` 用）
    ///
    /// 設定ファイルを読み直し、新しいクライアント設定で上書きする。
    /// 失敗した場合は現在の設定を維持する。
    ///
    /// # Errors
    /// `load_settings` と同じ
    pub fn apply_client_settings(&mut self, client_settings: Value) -> Result<(), ConfigError> {
        tracing::debug!("Applying client settings...");
        self.load_settings(self.workspace_root.clone(), Some(client_settings))
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &LocoSettings {
        &self.current_settings
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }
}

/// `{"locoI18n": {...}}` と `{...}` のどちらも受け付ける
fn section(mut options: Value) -> Value {
    match options.get_mut(SETTINGS_SECTION) {
        Some(inner) => inner.take(),
        None => options,
    }
}

/// オブジェクトを再帰的にマージする（`null` は上書きしない）
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base, overlay) => *base = overlay,
    }
}
