//! テスト用ユーティリティ
//!
//! リモートストアのインメモリ実装を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{
    AtomicBool,
    AtomicUsize,
    Ordering,
};

use async_trait::async_trait;

use crate::cache::TranslationTree;
use crate::remote::{
    RemoteError,
    RemoteStore,
};

/// In-memory [`RemoteStore`] with switchable failures and call counters.
#[derive(Debug, Default)]
pub(crate) struct FakeStore {
    /// アセット ID
    keys: Mutex<Vec<String>>,
    /// 言語ごとのエクスポート
    locales: Mutex<HashMap<String, TranslationTree>>,
    /// 作成されたアセット ID
    created_assets: Mutex<Vec<String>>,
    /// (id, language, text)
    translations: Mutex<Vec<(String, String, String)>>,
    /// 取得失敗スイッチ
    fail_fetch: AtomicBool,
    /// アセット作成失敗スイッチ
    fail_create_asset: AtomicBool,
    /// 翻訳設定失敗スイッチ
    fail_set_translation: AtomicBool,
    /// `list_keys` 回数
    list_calls: AtomicUsize,
    /// `export_locale` 回数
    export_calls: AtomicUsize,
}

impl FakeStore {
    /// Replaces the asset ids returned by `list_keys`.
    pub(crate) fn set_keys<const N: usize>(&self, keys: [&str; N]) {
        *self.keys.lock().unwrap() = keys.iter().map(ToString::to_string).collect();
    }

    /// Sets the export of one locale.
    pub(crate) fn set_locale(&self, language_code: &str, tree: TranslationTree) {
        self.locales.lock().unwrap().insert(language_code.to_string(), tree);
    }

    /// `list_keys` / `export_locale` が失敗するようにする
    pub(crate) fn fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::SeqCst);
    }

    /// `create_asset` が 409 を返すようにする
    pub(crate) fn fail_create_asset(&self, fail: bool) {
        self.fail_create_asset.store(fail, Ordering::SeqCst);
    }

    /// `set_translation` が 404 を返すようにする
    pub(crate) fn fail_set_translation(&self, fail: bool) {
        self.fail_set_translation.store(fail, Ordering::SeqCst);
    }

    /// `list_keys` の呼び出し回数
    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// `export_locale` の呼び出し回数
    pub(crate) fn export_calls(&self) -> usize {
        self.export_calls.load(Ordering::SeqCst)
    }

    /// 作成されたアセット ID
    pub(crate) fn created_assets(&self) -> Vec<String> {
        self.created_assets.lock().unwrap().clone()
    }

    /// `set_translation` の成功回数
    pub(crate) fn translation_calls(&self) -> usize {
        self.translations.lock().unwrap().len()
    }
}

/// 503 応答
fn unavailable() -> RemoteError {
    RemoteError::Rejected { status: 503, message: "Service Unavailable".to_string() }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn list_keys(&self) -> Result<Vec<String>, RemoteError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.keys.lock().unwrap().clone())
    }

    async fn export_locale(&self, language_code: &str) -> Result<TranslationTree, RemoteError> {
        self.export_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.locales.lock().unwrap().get(language_code).cloned().unwrap_or_default())
    }

    async fn create_asset(&self, id: &str, _default_value: &str) -> Result<(), RemoteError> {
        if self.fail_create_asset.load(Ordering::SeqCst) {
            return Err(RemoteError::Rejected {
                status: 409,
                message: format!("Asset '{id}' already exists"),
            });
        }
        self.created_assets.lock().unwrap().push(id.to_string());
        self.keys.lock().unwrap().push(id.to_string());
        Ok(())
    }

    async fn set_translation(
        &self,
        id: &str,
        language_code: &str,
        text: &str,
    ) -> Result<(), RemoteError> {
        if self.fail_set_translation.load(Ordering::SeqCst) {
            return Err(RemoteError::Rejected { status: 404, message: "Not Found".to_string() });
        }
        self.translations.lock().unwrap().push((
            id.to_string(),
            language_code.to_string(),
            text.to_string(),
        ));
        let mut locales = self.locales.lock().unwrap();
        locales.entry(language_code.to_string()).or_default().splice(id, text);
        Ok(())
    }
}
