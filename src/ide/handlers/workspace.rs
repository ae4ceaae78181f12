//! Workspace-related handlers.

use tower_lsp::lsp_types::DidChangeConfigurationParams;

use super::super::backend::Backend;
use crate::ide::engine::DocumentEvent;

/// 設定を反映し、エンジンを作り直して開いているドキュメントを再スキャンする
///
/// 無効な設定の場合は現在の設定とエンジンを維持する。
pub async fn handle_did_change_configuration(
    backend: &Backend,
    params: DidChangeConfigurationParams,
) {
    tracing::info!("didChangeConfiguration received");

    let mut config_manager = backend.config_manager.lock().await;
    let applied = config_manager.apply_client_settings(params.settings);
    drop(config_manager);

    if let Err(error) = applied {
        backend.report_error(format!("Configuration error: {error}")).await;
        return;
    }

    // 新しい設定では対象外になるドキュメントの診断を残さない
    backend.clear_diagnostics().await;
    if backend.rebuild_engine().await {
        backend.rescan_open_documents(DocumentEvent::Opened).await;
    }
}
