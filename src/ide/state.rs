//! LSP サーバーの共有状態

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{
    Mutex,
    RwLock,
};
use tower_lsp::lsp_types::Url;

use crate::ide::engine::KeyEngine;

/// クライアントが開いているドキュメント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDocument {
    /// LSP `languageId`
    pub language_id: String,
    /// 最新のテキスト（FULL sync）
    pub text: String,
    /// ドキュメントのバージョン
    pub version: i32,
}

/// LSP サーバーの共有状態
///
/// `Backend` から状態管理の責務を分離し、ハンドラー間で共有可能にします。
///
/// # ロック順序
///
/// 複数のロックを同時に取得する場合は、以下の順序を厳守してください：
/// 1. `engine`
/// 2. `open_documents`
#[derive(Clone, Default)]
pub struct ServerState {
    /// 設定が有効な間だけ存在するエンジン
    pub engine: Arc<RwLock<Option<Arc<KeyEngine>>>>,
    /// 現在開いているドキュメント
    pub open_documents: Arc<Mutex<HashMap<Url, OpenDocument>>>,
}

impl ServerState {
    /// 新しい `ServerState` を作成
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 現在のエンジンを取得
    pub async fn engine(&self) -> Option<Arc<KeyEngine>> {
        self.engine.read().await.clone()
    }

    /// エンジンを差し替え、以前のエンジンを返す
    pub async fn replace_engine(&self, engine: Option<KeyEngine>) -> Option<Arc<KeyEngine>> {
        let mut current = self.engine.write().await;
        std::mem::replace(&mut *current, engine.map(Arc::new))
    }

    /// 開いているドキュメントのスナップショット
    pub async fn open_document(&self, uri: &Url) -> Option<OpenDocument> {
        self.open_documents.lock().await.get(uri).cloned()
    }

    /// 開いているドキュメントの URI 一覧
    pub async fn open_uris(&self) -> Vec<Url> {
        self.open_documents.lock().await.keys().cloned().collect()
    }
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("engine", &"<Option<Arc<KeyEngine>>>")
            .field("open_documents", &"<HashMap<Url, OpenDocument>>")
            .finish()
    }
}
