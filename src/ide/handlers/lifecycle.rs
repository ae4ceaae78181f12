//! LSP lifecycle handlers: `initialize`, `initialized`, `shutdown`.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CodeActionKind,
    CodeActionOptions,
    CodeActionProviderCapability,
    ExecuteCommandOptions,
    HoverProviderCapability,
    InitializeParams,
    InitializeResult,
    InitializedParams,
    MessageType,
    OneOf,
    SaveOptions,
    ServerCapabilities,
    ServerInfo,
    TextDocumentSyncCapability,
    TextDocumentSyncKind,
    TextDocumentSyncOptions,
    TextDocumentSyncSaveOptions,
    WorkDoneProgressOptions,
    WorkspaceFoldersServerCapabilities,
    WorkspaceServerCapabilities,
};

use super::super::backend::Backend;
use crate::ide::code_actions::{
    CREATE_TRANSLATION_COMMAND,
    REFRESH_TRANSLATIONS_COMMAND,
};
use crate::ide::engine::DocumentEvent;

/// `initialize` リクエストを処理（設定の読み込みとエンジンの構築）
pub async fn handle_initialize(
    backend: &Backend,
    params: InitializeParams,
) -> Result<InitializeResult> {
    #[allow(deprecated)] // root_uri は古いクライアント向けのフォールバック
    let workspace_root = params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .map(|folder| &folder.uri)
        .or(params.root_uri.as_ref())
        .and_then(Backend::uri_to_path);

    let mut config_manager = backend.config_manager.lock().await;
    let loaded = config_manager.load_settings(workspace_root, params.initialization_options);
    drop(config_manager);

    match loaded {
        Ok(()) => {
            backend.rebuild_engine().await;
        }
        Err(error) => {
            backend.report_error(format!("Configuration error: {error}")).await;
        }
    }

    Ok(InitializeResult {
        server_info: Some(ServerInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    will_save: None,
                    will_save_wait_until: None,
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(true),
                    })),
                },
            )),
            hover_provider: Some(HoverProviderCapability::Simple(true)),
            inlay_hint_provider: Some(OneOf::Left(true)),
            code_action_provider: Some(CodeActionProviderCapability::Options(
                CodeActionOptions {
                    code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                    work_done_progress_options: WorkDoneProgressOptions::default(),
                    resolve_provider: None,
                },
            )),
            execute_command_provider: Some(ExecuteCommandOptions {
                commands: vec![
                    CREATE_TRANSLATION_COMMAND.to_string(),
                    REFRESH_TRANSLATIONS_COMMAND.to_string(),
                ],
                work_done_progress_options: WorkDoneProgressOptions::default(),
            }),
            workspace: Some(WorkspaceServerCapabilities {
                workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                    supported: Some(true),
                    change_notifications: Some(OneOf::Left(true)),
                }),
                file_operations: None,
            }),
            ..ServerCapabilities::default()
        },
    })
}

/// 初回のキャッシュ取得を行う（失敗は一度だけ通知する）
pub async fn handle_initialized(backend: &Backend, _: InitializedParams) {
    backend.client.log_message(MessageType::INFO, "initialized!").await;

    let Some(engine) = backend.state.engine().await else {
        return;
    };

    match engine.refresh().await {
        Ok(summary) => {
            backend
                .client
                .log_message(
                    MessageType::INFO,
                    format!("Loaded {} translation entries ({:?} mode)", summary.entries, summary.mode),
                )
                .await;
        }
        Err(error) => {
            backend.report_error(format!("Failed to load translations: {error}")).await;
        }
    }

    backend.rescan_open_documents(DocumentEvent::Opened).await;
}

/// `shutdown` リクエストを処理
#[allow(clippy::unused_async)]
pub async fn handle_shutdown() -> Result<()> {
    Ok(())
}
