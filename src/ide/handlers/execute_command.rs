//! Execute Command ハンドラー
//!
//! `workspace/executeCommand` リクエストを処理し、
//! カスタムコマンドを実行します。

use serde_json::Value;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    ExecuteCommandParams,
    MessageType,
};

use super::super::backend::Backend;
use crate::ide::code_actions::{
    CREATE_TRANSLATION_COMMAND,
    REFRESH_TRANSLATIONS_COMMAND,
};
use crate::ide::engine::DocumentEvent;

/// `workspace/executeCommand` リクエストを処理
pub async fn handle_execute_command(
    backend: &Backend,
    params: ExecuteCommandParams,
) -> Result<Option<Value>> {
    tracing::debug!(command = %params.command, "Execute Command request");

    match params.command.as_str() {
        CREATE_TRANSLATION_COMMAND => handle_create_translation(backend, &params.arguments).await,
        REFRESH_TRANSLATIONS_COMMAND => handle_refresh_translations(backend).await,
        _ => {
            tracing::warn!("Unknown command: {}", params.command);
            Ok(None)
        }
    }
}

/// `loco-i18n.createTranslation` コマンドを実行
///
/// # Arguments
/// * `arguments[0]` - 翻訳キー (例: "home.title")
/// * `arguments[1]` - 翻訳テキスト（任意。ツリーモードでは必須）
async fn handle_create_translation(backend: &Backend, args: &[Value]) -> Result<Option<Value>> {
    let Some(key) = args.first().and_then(Value::as_str) else {
        tracing::warn!("Invalid arguments for {CREATE_TRANSLATION_COMMAND}");
        return Ok(None);
    };
    let text = args.get(1).and_then(Value::as_str);

    let Some(engine) = backend.state.engine().await else {
        backend.report_error("Loco i18n is not configured".to_string()).await;
        return Ok(None);
    };

    tracing::debug!(key = %key, "Executing {CREATE_TRANSLATION_COMMAND}");

    match engine.create(key, text).await {
        Ok(()) => {
            backend
                .client
                .show_message(MessageType::INFO, format!("Created translation key \"{key}\""))
                .await;
            backend.rescan_open_documents(DocumentEvent::Changed).await;
        }
        Err(error) => {
            backend
                .report_error(format!("Failed to create translation key \"{key}\": {error}"))
                .await;
        }
    }

    Ok(None)
}

/// `loco-i18n.refreshLocalTranslations` コマンドを実行
async fn handle_refresh_translations(backend: &Backend) -> Result<Option<Value>> {
    let Some(engine) = backend.state.engine().await else {
        backend.report_error("Loco i18n is not configured".to_string()).await;
        return Ok(None);
    };

    match engine.refresh().await {
        Ok(summary) => {
            backend
                .client
                .show_message(
                    MessageType::INFO,
                    format!("Translations refreshed ({} entries)", summary.entries),
                )
                .await;
        }
        Err(error) => {
            backend.report_error(format!("Failed to refresh translations: {error}")).await;
        }
    }

    // 失敗しても前回のスナップショットで再スキャンする
    backend.rescan_open_documents(DocumentEvent::Changed).await;

    Ok(None)
}
