//! Key checking engine: scanning, reconciliation and per-document state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

use salsa::Setter;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::cache::{
    CacheError,
    LookupHit,
    RefreshSummary,
    TranslationCache,
};
use crate::config::{
    ConfigError,
    DocumentFilter,
    LocoSettings,
    MatcherError,
};
use crate::db::I18nDatabaseImpl;
use crate::ide::diagnostics::{
    DiagnosticRecord,
    reconcile,
};
use crate::input::source::{
    ProgrammingLanguage,
    SourceFile,
};
use crate::remote::{
    LocoClient,
    RemoteError,
};
use crate::syntax::analyzer::extractor::extract_keys;
use crate::syntax::{
    ExtractedKey,
    ScanError,
    analyze_source,
};

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentEvent {
    /// `textDocument/didOpen`, or a rescan after the engine was rebuilt
    Opened,
    /// New text, or a rescan after the cache changed
    Changed,
    /// `textDocument/didSave`
    Saved,
}

/// A document as seen by the host.
#[derive(Debug, Clone)]
pub struct Document {
    /// Document URI, used as the state key
    pub uri: String,
    /// LSP `languageId`
    pub language_id: String,
    /// Full text
    pub text: String,
    /// Local path, when the URI has one
    pub path: Option<PathBuf>,
}

/// Result of handling a document event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Not a target language, or excluded
    Skipped,
    /// Scan and lookups succeeded
    Fresh(Vec<DiagnosticRecord>),
    /// The cache has never been populated; nothing is reported
    Suppressed,
    /// The document does not parse; the previous records are kept
    Stale { records: Vec<DiagnosticRecord>, error: ScanError },
    /// A scan of the same document that started later already committed,
    /// or the document was closed while scanning
    Superseded,
}

/// Keys of an open document together with the text they were read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentKeys {
    /// Text the keys were scanned from
    pub text: String,
    /// Keys in source order
    pub keys: Vec<ExtractedKey>,
}

/// Errors while building an engine from settings.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Remote settings are missing or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The HTTP client could not be built
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// An exclude pattern does not compile
    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

/// Per-document state.
struct DocumentState {
    /// Salsa 入力
    file: SourceFile,
    /// Generation of the scan that (re)opened the document.
    /// Scans started before it belong to a closed instance.
    opened: u64,
    /// Generation of the last committed scan
    committed: u64,
    /// Records of the last successful scan
    records: Option<Vec<DiagnosticRecord>>,
}

impl std::fmt::Debug for DocumentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentState")
            .field("file", &"<SourceFile>")
            .field("opened", &self.opened)
            .field("committed", &self.committed)
            .field("records", &self.records)
            .finish()
    }
}

/// Joins source scans with the translation cache.
///
/// # ロック順序
///
/// 1. `documents`
/// 2. `db`
pub struct KeyEngine {
    /// 全ドキュメントで共有するキャッシュ
    cache: Arc<TranslationCache>,
    /// 対象言語と除外パターン
    filter: DocumentFilter,
    /// 翻訳関数名
    function_name: String,
    /// URI ごとの状態
    documents: Mutex<HashMap<String, DocumentState>>,
    /// スキャンの世代。全ドキュメントで単調増加し、close を跨いでも戻らない
    generation: AtomicU64,
    /// Salsa データベース
    db: Mutex<I18nDatabaseImpl>,
}

impl std::fmt::Debug for KeyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyEngine")
            .field("cache", &self.cache)
            .field("filter", &self.filter)
            .field("function_name", &self.function_name)
            .field("documents", &"<HashMap<String, DocumentState>>")
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .field("db", &"<I18nDatabaseImpl>")
            .finish()
    }
}

impl KeyEngine {
    /// Creates an engine with no open documents.
    #[must_use]
    pub fn new(
        cache: Arc<TranslationCache>,
        filter: DocumentFilter,
        function_name: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            filter,
            function_name: function_name.into(),
            documents: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
            db: Mutex::new(I18nDatabaseImpl::default()),
        }
    }

    /// Builds an engine backed by the Loco API.
    ///
    /// # Errors
    /// - Missing remote settings
    /// - Unusable remote URL
    /// - Invalid exclude pattern
    pub fn from_settings(
        settings: &LocoSettings,
        workspace_root: Option<PathBuf>,
    ) -> Result<Self, SetupError> {
        let remote = settings.remote_config()?;
        let language_code = remote.language_code().to_string();
        let store = LocoClient::new(remote)?;
        let filter = DocumentFilter::new(workspace_root, settings)?;
        let cache = TranslationCache::new(Arc::new(store), settings.cache_mode, language_code);

        Ok(Self::new(Arc::new(cache), filter, settings.t_function_name.clone()))
    }

    /// Shared translation cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    /// Name of the translation function.
    #[must_use]
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Handles one host event and reports what to show for the document.
    pub async fn on_document_event(&self, event: DocumentEvent, document: &Document) -> ScanOutcome {
        if !self.filter.accepts(&document.language_id, &document.uri, document.path.as_deref()) {
            tracing::debug!(uri = %document.uri, language_id = %document.language_id, "Document skipped");
            return ScanOutcome::Skipped;
        }

        let (generation, scanned) = self.start_scan(document).await;
        tracing::debug!(uri = %document.uri, ?event, generation, "Scan started");

        let outcome = match scanned {
            Ok(keys) => {
                if self.cache.ensure_populated().await
                    && let Some(snapshot) = self.cache.snapshot().await
                {
                    ScanOutcome::Fresh(reconcile(&keys, &snapshot))
                } else {
                    ScanOutcome::Suppressed
                }
            }
            Err(error) => ScanOutcome::Stale { records: Vec::new(), error },
        };

        self.commit(&document.uri, generation, outcome).await
    }

    /// Registers the new text and scans it. Returns the scan generation.
    async fn start_scan(&self, document: &Document) -> (u64, Result<Vec<ExtractedKey>, ScanError>) {
        let language = ProgrammingLanguage::detect(&document.language_id, &document.uri);

        let mut documents = self.documents.lock().await;
        let mut db = self.db.lock().await;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let state = documents.entry(document.uri.clone()).or_insert_with(|| DocumentState {
            file: SourceFile::new(&*db, document.uri.clone(), document.text.clone(), language),
            opened: generation,
            committed: 0,
            records: None,
        });
        if state.file.text(&*db) != &document.text {
            state.file.set_text(&mut *db).to(document.text.clone());
        }
        if state.file.language(&*db) != language {
            state.file.set_language(&mut *db).to(language);
        }

        let scanned = analyze_source(&*db, state.file, self.function_name.clone());
        (generation, scanned)
    }

    /// Stores the outcome unless a later scan already committed or the
    /// document was closed since this scan started.
    async fn commit(&self, uri: &str, generation: u64, outcome: ScanOutcome) -> ScanOutcome {
        let mut documents = self.documents.lock().await;
        let Some(state) = documents.get_mut(uri) else {
            // スキャン中に閉じられた
            return ScanOutcome::Superseded;
        };

        if generation < state.opened || state.committed > generation {
            tracing::debug!(uri, generation, committed = state.committed, "Scan superseded");
            return ScanOutcome::Superseded;
        }
        state.committed = generation;

        match outcome {
            ScanOutcome::Fresh(records) => {
                state.records = Some(records.clone());
                ScanOutcome::Fresh(records)
            }
            ScanOutcome::Stale { error, .. } => {
                tracing::debug!(uri, %error, "Scan failed, keeping previous records");
                ScanOutcome::Stale { records: state.records.clone().unwrap_or_default(), error }
            }
            ScanOutcome::Suppressed => {
                state.records = None;
                ScanOutcome::Suppressed
            }
            other => other,
        }
    }

    /// Keys of an open document (memoized per text). `None` when the document
    /// is unknown or does not parse.
    pub async fn document_keys(&self, uri: &str) -> Option<DocumentKeys> {
        let documents = self.documents.lock().await;
        let file = documents.get(uri)?.file;
        let db = self.db.lock().await;

        let keys = analyze_source(&*db, file, self.function_name.clone()).ok()?;
        Some(DocumentKeys { text: file.text(&*db).clone(), keys })
    }

    /// Scans a text without touching any document state.
    ///
    /// # Errors
    /// `ScanError` when the text does not parse
    pub fn scan(
        text: &str,
        language: ProgrammingLanguage,
        function_name: &str,
    ) -> Result<Vec<ExtractedKey>, ScanError> {
        extract_keys(text, &language.tree_sitter_language(), function_name)
    }

    /// Looks a key up, populating the cache on first use.
    pub async fn lookup(&self, key: &str) -> Option<LookupHit> {
        self.cache.lookup(key).await
    }

    /// # Errors
    /// See [`TranslationCache::create`]
    pub async fn create(&self, key: &str, text: Option<&str>) -> Result<(), CacheError> {
        self.cache.create(key, text).await
    }

    /// # Errors
    /// See [`TranslationCache::refresh`]
    pub async fn refresh(&self) -> Result<RefreshSummary, CacheError> {
        self.cache.refresh().await
    }

    /// Forgets a closed document.
    pub async fn close(&self, uri: &str) {
        self.documents.lock().await.remove(uri);
    }
}
