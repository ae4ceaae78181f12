//! Document synchronization handlers.

use tower_lsp::lsp_types::{
    DidChangeTextDocumentParams,
    DidCloseTextDocumentParams,
    DidOpenTextDocumentParams,
    DidSaveTextDocumentParams,
};

use super::super::backend::Backend;
use crate::ide::engine::DocumentEvent;
use crate::ide::state::OpenDocument;

/// `textDocument/didOpen` 通知を処理
pub async fn handle_did_open(backend: &Backend, params: DidOpenTextDocumentParams) {
    let item = params.text_document;
    tracing::debug!(uri = %item.uri, language_id = %item.language_id, "Document opened");

    {
        let mut open_documents = backend.state.open_documents.lock().await;
        open_documents.insert(
            item.uri.clone(),
            OpenDocument { language_id: item.language_id, text: item.text, version: item.version },
        );
    }

    backend.scan_and_publish(&item.uri, DocumentEvent::Opened).await;
}

/// `textDocument/didChange` 通知を処理
pub async fn handle_did_change(backend: &Backend, params: DidChangeTextDocumentParams) {
    let uri = params.text_document.uri;

    // FULL sync なので最後の変更が全文
    let Some(change) = params.content_changes.into_iter().next_back() else {
        return;
    };

    {
        let mut open_documents = backend.state.open_documents.lock().await;
        let Some(document) = open_documents.get_mut(&uri) else {
            tracing::warn!(uri = %uri, "Change for a document that is not open");
            return;
        };
        document.text = change.text;
        document.version = params.text_document.version;
    }

    backend.scan_and_publish(&uri, DocumentEvent::Changed).await;
}

/// `textDocument/didSave` 通知を処理
pub async fn handle_did_save(backend: &Backend, params: DidSaveTextDocumentParams) {
    let uri = params.text_document.uri;

    if let Some(text) = params.text {
        let mut open_documents = backend.state.open_documents.lock().await;
        if let Some(document) = open_documents.get_mut(&uri) {
            document.text = text;
        }
    }

    backend.scan_and_publish(&uri, DocumentEvent::Saved).await;
}

/// `textDocument/didClose` 通知を処理
pub async fn handle_did_close(backend: &Backend, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri;
    tracing::debug!(uri = %uri, "Document closed");

    backend.state.open_documents.lock().await.remove(&uri);
    if let Some(engine) = backend.state.engine().await {
        engine.close(uri.as_str()).await;
    }

    backend.client.publish_diagnostics(uri, Vec::new(), None).await;
}
