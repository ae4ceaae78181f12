//! LSP Backend 実装

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CodeActionParams,
    CodeActionResponse,
    DidChangeConfigurationParams,
    DidChangeTextDocumentParams,
    DidCloseTextDocumentParams,
    DidOpenTextDocumentParams,
    DidSaveTextDocumentParams,
    ExecuteCommandParams,
    Hover,
    HoverParams,
    InitializeParams,
    InitializeResult,
    InitializedParams,
    InlayHint,
    InlayHintParams,
    MessageType,
    Url,
};
use tower_lsp::{
    Client,
    LanguageServer,
};

use super::handlers;
use crate::config::ConfigManager;
use crate::ide::diagnostics::to_lsp_diagnostics;
use crate::ide::engine::{
    Document,
    DocumentEvent,
    KeyEngine,
    ScanOutcome,
};
use crate::ide::state::ServerState;

/// LSP Backend
#[derive(Clone)]
pub struct Backend {
    /// LSP クライアント
    pub client: Client,
    /// 設定管理
    pub config_manager: Arc<Mutex<ConfigManager>>,
    /// サーバーの共有状態
    pub state: ServerState,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("config_manager", &"<ConfigManager>")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Backend {
    /// 新しい `Backend` を作成
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            config_manager: Arc::new(Mutex::new(ConfigManager::new())),
            state: ServerState::new(),
        }
    }

    /// URI をファイルパスに変換
    pub(crate) fn uri_to_path(uri: &Url) -> Option<PathBuf> {
        uri.to_file_path().ok()
    }

    /// エラーをログに残し、ユーザーに通知する
    pub(crate) async fn report_error(&self, message: String) {
        tracing::error!("{message}");
        self.client.show_message(MessageType::ERROR, message).await;
    }

    /// 現在の設定からエンジンを作り直す
    ///
    /// 失敗した場合はエンジンなしの状態になり、エラーを通知する。
    pub(crate) async fn rebuild_engine(&self) -> bool {
        let (settings, workspace_root) = {
            let config_manager = self.config_manager.lock().await;
            (config_manager.get_settings().clone(), config_manager.workspace_root().cloned())
        };

        match KeyEngine::from_settings(&settings, workspace_root) {
            Ok(engine) => {
                tracing::info!(
                    cache_mode = ?settings.cache_mode,
                    function_name = %settings.t_function_name,
                    "Key engine ready"
                );
                self.state.replace_engine(Some(engine)).await;
                true
            }
            Err(error) => {
                self.state.replace_engine(None).await;
                self.report_error(format!("Loco i18n is not configured: {error}")).await;
                false
            }
        }
    }

    /// ドキュメントをスキャンして診断を送信
    pub(crate) async fn scan_and_publish(&self, uri: &Url, event: DocumentEvent) {
        let Some(engine) = self.state.engine().await else {
            tracing::debug!(uri = %uri, "No engine, skipping scan");
            return;
        };
        let Some(open) = self.state.open_document(uri).await else {
            return;
        };

        let document = Document {
            uri: uri.to_string(),
            language_id: open.language_id,
            text: open.text,
            path: Self::uri_to_path(uri),
        };

        let outcome = engine.on_document_event(event, &document).await;

        let diagnostics = match &outcome {
            ScanOutcome::Skipped | ScanOutcome::Superseded => return,
            ScanOutcome::Suppressed => Vec::new(),
            ScanOutcome::Fresh(records) => to_lsp_diagnostics(records, &document.text, None),
            // 前回のレコードの位置は現在のテキストに丸められる
            ScanOutcome::Stale { records, error } => {
                to_lsp_diagnostics(records, &document.text, Some(&error.to_string()))
            }
        };

        tracing::debug!(uri = %uri, count = diagnostics.len(), "Publishing diagnostics");
        self.client.publish_diagnostics(uri.clone(), diagnostics, Some(open.version)).await;
    }

    /// 開いている全ドキュメントを再スキャン
    pub(crate) async fn rescan_open_documents(&self, event: DocumentEvent) {
        for uri in self.state.open_uris().await {
            self.scan_and_publish(&uri, event).await;
        }
    }

    /// 開いている全ドキュメントの診断をクリア
    pub(crate) async fn clear_diagnostics(&self) {
        for uri in self.state.open_uris().await {
            self.client.publish_diagnostics(uri, Vec::new(), None).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handlers::lifecycle::handle_initialize(self, params).await
    }

    async fn initialized(&self, params: InitializedParams) {
        handlers::lifecycle::handle_initialized(self, params).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handlers::lifecycle::handle_shutdown().await
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        handlers::workspace::handle_did_change_configuration(self, params).await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        handlers::document_sync::handle_did_open(self, params).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        handlers::document_sync::handle_did_change(self, params).await;
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        handlers::document_sync::handle_did_save(self, params).await;
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        handlers::document_sync::handle_did_close(self, params).await;
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        handlers::features::handle_hover(self, params).await
    }

    async fn inlay_hint(&self, params: InlayHintParams) -> Result<Option<Vec<InlayHint>>> {
        handlers::features::handle_inlay_hint(self, params).await
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        handlers::code_action::handle_code_action(self, params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        handlers::execute_command::handle_execute_command(self, params).await
    }
}
