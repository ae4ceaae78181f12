//! Code Action ハンドラー
//!
//! `textDocument/codeAction` リクエストを処理し、
//! 見つからない翻訳キーを作成するクイックフィックスを提供します。

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    CodeActionParams,
    CodeActionResponse,
};

use super::super::backend::Backend;

/// `textDocument/codeAction` リクエストを処理
///
/// 範囲内の `missing-key` 診断ごとに「Create translation key」アクションを返します。
#[allow(clippy::unused_async)]
pub async fn handle_code_action(
    _backend: &Backend,
    params: CodeActionParams,
) -> Result<Option<CodeActionResponse>> {
    let uri = &params.text_document.uri;
    let position = params.range.start;

    tracing::debug!(uri = %uri, line = position.line, character = position.character, "Code Action request");

    let actions = crate::ide::code_actions::generate_code_actions(&params.context.diagnostics);

    tracing::debug!("Generated {} code actions", actions.len());

    Ok(Some(actions))
}
