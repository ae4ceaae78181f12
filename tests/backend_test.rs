//! LSP バックエンドの結合テスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]
#![allow(deprecated)]

use googletest::prelude::*;
use loco_i18n_language_server::Backend;
use loco_i18n_language_server::ide::code_actions::{
    CREATE_TRANSLATION_COMMAND,
    REFRESH_TRANSLATIONS_COMMAND,
};
use loco_i18n_language_server::ide::diagnostics::{
    DIAGNOSTIC_SOURCE,
    MISSING_KEY_CODE,
};
use serde_json::json;
use tower_lsp::lsp_types::*;
use tower_lsp::{
    LanguageServer,
    LspService,
};

fn create_test_backend() -> Backend {
    let (service, _socket) = LspService::new(Backend::new);
    service.inner().clone()
}

fn init_params(initialization_options: Option<serde_json::Value>) -> InitializeParams {
    InitializeParams {
        process_id: None,
        root_path: None,
        root_uri: None,
        initialization_options,
        capabilities: ClientCapabilities::default(),
        trace: None,
        workspace_folders: None,
        client_info: None,
        locale: None,
    }
}

fn configured_options() -> serde_json::Value {
    json!({
        "locoI18n": {
            "remoteUrl": "https://localise.biz",
            "apiKey": "secret",
            "lang": "en"
        }
    })
}

#[tokio::test]
async fn test_initialize_advertises_capabilities() {
    let backend = create_test_backend();

    let result = backend.initialize(init_params(None)).await.unwrap();
    let capabilities = result.capabilities;

    assert!(matches!(capabilities.hover_provider, Some(HoverProviderCapability::Simple(true))));
    assert!(matches!(capabilities.inlay_hint_provider, Some(OneOf::Left(true))));
    assert!(capabilities.code_action_provider.is_some());
    let commands = capabilities.execute_command_provider.unwrap().commands;
    assert_that!(
        commands,
        unordered_elements_are![eq(CREATE_TRANSLATION_COMMAND), eq(REFRESH_TRANSLATIONS_COMMAND)]
    );
}

#[tokio::test]
async fn test_initialize_without_remote_settings_has_no_engine() {
    let backend = create_test_backend();

    backend.initialize(init_params(None)).await.unwrap();

    assert!(backend.state.engine().await.is_none());
}

#[tokio::test]
async fn test_initialize_with_options_builds_engine() {
    let backend = create_test_backend();

    backend.initialize(init_params(Some(configured_options()))).await.unwrap();

    let engine = backend.state.engine().await.unwrap();
    assert_that!(engine.function_name(), eq("t"));
}

#[tokio::test]
async fn test_did_change_configuration_rebuilds_engine() {
    let backend = create_test_backend();
    backend.initialize(init_params(None)).await.unwrap();

    let mut options = configured_options();
    options["locoI18n"]["tFunctionName"] = json!("translate");
    backend.did_change_configuration(DidChangeConfigurationParams { settings: options }).await;

    let engine = backend.state.engine().await.unwrap();
    assert_that!(engine.function_name(), eq("translate"));
}

#[tokio::test]
async fn test_invalid_configuration_keeps_engine() {
    let backend = create_test_backend();
    backend.initialize(init_params(Some(configured_options()))).await.unwrap();

    backend
        .did_change_configuration(DidChangeConfigurationParams {
            settings: json!({ "locoI18n": { "tFunctionName": "not valid" } }),
        })
        .await;

    let engine = backend.state.engine().await.unwrap();
    assert_that!(engine.function_name(), eq("t"));
}

#[tokio::test]
async fn test_hover_without_engine_returns_none() {
    let backend = create_test_backend();
    backend.initialize(init_params(None)).await.unwrap();

    let hover = backend
        .hover(HoverParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier {
                    uri: Url::parse("file:///workspace/app.ts").unwrap(),
                },
                position: Position { line: 0, character: 0 },
            },
            work_done_progress_params: WorkDoneProgressParams { work_done_token: None },
        })
        .await
        .unwrap();

    assert!(hover.is_none());
}

#[tokio::test]
async fn test_code_action_offers_create_quick_fix() {
    let backend = create_test_backend();
    let diagnostic = Diagnostic {
        range: Range { start: Position::new(0, 2), end: Position::new(0, 14) },
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        code: Some(NumberOrString::String(MISSING_KEY_CODE.to_string())),
        message: "Missing translation key: \"home.title\"".to_string(),
        data: Some(json!({ "key": "home.title" })),
        ..Diagnostic::default()
    };

    let actions = backend
        .code_action(CodeActionParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse("file:///workspace/app.ts").unwrap(),
            },
            range: diagnostic.range,
            context: CodeActionContext {
                diagnostics: vec![diagnostic],
                only: None,
                trigger_kind: None,
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        })
        .await
        .unwrap()
        .unwrap();

    let CodeActionOrCommand::CodeAction(action) = &actions[0] else {
        panic!("Expected a code action");
    };
    assert_eq!(action.title, "Create translation key: \"home.title\"");
    assert_eq!(
        action.command.as_ref().unwrap().arguments,
        Some(vec![json!("home.title")])
    );
}

#[tokio::test]
async fn test_unknown_command_returns_none() {
    let backend = create_test_backend();

    let result = backend
        .execute_command(ExecuteCommandParams {
            command: "loco-i18n.unknown".to_string(),
            arguments: vec![],
            work_done_progress_params: WorkDoneProgressParams::default(),
        })
        .await
        .unwrap();

    assert!(result.is_none());
}
