//! LSP 機能ハンドラー
//!
//! `hover` と `inlayHint` の処理を担当します。

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    Hover,
    HoverParams,
    InlayHint,
    InlayHintParams,
};

use super::super::backend::Backend;
use crate::ide::hover::hover_for_key;
use crate::ide::inlay_hints::generate_inlay_hints;
use crate::syntax::key_at_offset;
use crate::types::SourcePosition;

/// `textDocument/hover` リクエストを処理
pub async fn handle_hover(backend: &Backend, params: HoverParams) -> Result<Option<Hover>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, "Hover request");

    let Some(engine) = backend.state.engine().await else {
        return Ok(None);
    };
    let Some(document) = engine.document_keys(uri.as_str()).await else {
        tracing::debug!(uri = %uri, "Document not scanned");
        return Ok(None);
    };

    let offset = SourcePosition::from(position).to_offset(&document.text);
    let Some(key) = key_at_offset(&document.keys, offset) else {
        tracing::debug!("No translation key found at position");
        return Ok(None);
    };

    // 見つからないキーは診断で表示される
    let Some(hit) = engine.lookup(&key.value).await else {
        return Ok(None);
    };

    Ok(Some(hover_for_key(&document.text, key, &hit)))
}

/// `textDocument/inlayHint` リクエストを処理
pub async fn handle_inlay_hint(
    backend: &Backend,
    params: InlayHintParams,
) -> Result<Option<Vec<InlayHint>>> {
    let uri = params.text_document.uri;

    let (enabled, max_length) = {
        let config_manager = backend.config_manager.lock().await;
        let settings = config_manager.get_settings();
        (settings.inlay_hints, settings.inlay_hint_max_length)
    };
    if !enabled {
        return Ok(None);
    }

    let Some(engine) = backend.state.engine().await else {
        return Ok(None);
    };
    let Some(document) = engine.document_keys(uri.as_str()).await else {
        return Ok(None);
    };
    if !engine.cache().ensure_populated().await {
        return Ok(None);
    }
    let Some(snapshot) = engine.cache().snapshot().await else {
        return Ok(None);
    };

    let hints =
        generate_inlay_hints(&document.text, &document.keys, &snapshot, params.range, max_length);
    tracing::debug!(uri = %uri, count = hints.len(), "Generated inlay hints");

    Ok(Some(hints))
}
