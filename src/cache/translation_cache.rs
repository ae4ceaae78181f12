//! Remote-authoritative, locally patched translation cache.

use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;
use tokio::sync::{
    Mutex,
    RwLock,
};

use super::tree::split_key;
use super::{
    KeySet,
    TranslationNode,
    TranslationTree,
};
use crate::remote::{
    DEFAULT_ASSET_VALUE,
    RemoteError,
    RemoteStore,
};

/// What the cache mirrors from the remote store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheMode {
    /// Asset ids only (existence checks)
    Keys,
    /// Full key → translation tree of one locale
    #[default]
    Translations,
}

/// Cache state as of the last successful refresh or confirmed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot {
    /// Asset ids, matched verbatim
    Keys(KeySet),
    /// Locale export, walked by dotted key
    Translations(TranslationTree),
}

impl Snapshot {
    /// Finds `key`. Only translations mode splits it on dots.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<LookupHit> {
        match self {
            Self::Keys(keys) => keys.contains(key).then_some(LookupHit::Key),
            Self::Translations(tree) => tree.lookup(key).map(|node| match node {
                TranslationNode::Leaf(text) => LookupHit::Text(text.clone()),
                TranslationNode::Namespace(tree) => LookupHit::Namespace(tree.clone()),
            }),
        }
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        match self {
            Self::Keys(keys) => keys.contains(key),
            Self::Translations(tree) => tree.lookup(key).is_some(),
        }
    }

    /// Number of keys (keys mode) or leaves (translations mode).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Keys(keys) => keys.len(),
            Self::Translations(tree) => tree.leaf_count(),
        }
    }

    /// Whether the remote returned nothing for this mode.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Keys(keys) => keys.is_empty(),
            Self::Translations(tree) => tree.is_empty(),
        }
    }
}

/// A found key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupHit {
    /// Registered (keys mode carries no text)
    Key,
    /// Translation text of a leaf
    Text(String),
    /// The key names a namespace, not a translation
    Namespace(TranslationTree),
}

impl LookupHit {
    /// Display form for hovers and inlay hints.
    #[must_use]
    pub fn display_text(&self) -> Option<String> {
        match self {
            Self::Key => None,
            Self::Text(text) => Some(text.clone()),
            Self::Namespace(tree) => Some(TranslationNode::Namespace(tree.clone()).serialize()),
        }
    }
}

/// Result of a successful refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Mode the cache was refreshed in
    pub mode: CacheMode,
    /// Keys (keys mode) or leaves (translations mode) loaded
    pub entries: usize,
}

/// Cache operation errors.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Refresh failed; the previous snapshot is kept
    #[error("Failed to fetch translations: {0}")]
    Fetch(#[source] RemoteError),
    /// A create call was rejected; nothing was patched locally
    #[error("Failed to create translation: {0}")]
    Write(#[source] RemoteError),
    /// Translations mode needs the text of a new key
    #[error("Translation text is required to create '{0}'")]
    MissingText(String),
    /// Empty key, or an empty dot segment in translations mode
    #[error("Invalid translation key '{0}'")]
    InvalidKey(String),
}

/// In-memory copy of the remote translation set.
///
/// Readers clone the `Arc` of the current snapshot and never observe a
/// partial update. Refresh and create take `writer` for their whole
/// duration, so a refresh cannot drop a key confirmed by an earlier create.
#[derive(Debug)]
pub struct TranslationCache {
    /// リモートストア
    store: Arc<dyn RemoteStore>,
    /// キャッシュモード
    mode: CacheMode,
    /// 参照・作成に使う言語
    language_code: String,
    /// 現在のスナップショット
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    /// refresh と create を直列化する
    writer: Mutex<()>,
}

impl TranslationCache {
    /// Creates an unpopulated cache.
    #[must_use]
    pub fn new(
        store: Arc<dyn RemoteStore>,
        mode: CacheMode,
        language_code: impl Into<String>,
    ) -> Self {
        Self {
            store,
            mode,
            language_code: language_code.into(),
            snapshot: RwLock::new(None),
            writer: Mutex::new(()),
        }
    }

    /// Cache mode.
    #[must_use]
    pub const fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Current snapshot, `None` until the first successful refresh.
    pub async fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().await.clone()
    }

    /// Replaces the snapshot with a fresh copy of the remote state.
    ///
    /// # Errors
    /// `CacheError::Fetch` when the remote call fails; the previous snapshot
    /// is kept.
    pub async fn refresh(&self) -> Result<RefreshSummary, CacheError> {
        let _writer = self.writer.lock().await;
        self.refresh_locked().await
    }

    /// Refresh body; the caller holds `writer`.
    async fn refresh_locked(&self) -> Result<RefreshSummary, CacheError> {
        tracing::debug!(mode = ?self.mode, "Refreshing translation cache");

        let fetched = match self.mode {
            CacheMode::Keys => {
                self.store.list_keys().await.map(|keys| Snapshot::Keys(keys.into_iter().collect()))
            }
            CacheMode::Translations => self
                .store
                .export_locale(&self.language_code)
                .await
                .map(Snapshot::Translations),
        };

        match fetched {
            Ok(snapshot) => {
                if snapshot.is_empty() {
                    tracing::warn!(
                        mode = ?self.mode,
                        language_code = %self.language_code,
                        "Remote returned no translations"
                    );
                }
                let summary = RefreshSummary { mode: self.mode, entries: snapshot.len() };
                *self.snapshot.write().await = Some(Arc::new(snapshot));
                tracing::info!(
                    mode = ?self.mode,
                    entries = summary.entries,
                    "Translation cache refreshed"
                );
                Ok(summary)
            }
            Err(error) => {
                tracing::warn!(mode = ?self.mode, %error, "Failed to refresh translation cache");
                Err(CacheError::Fetch(error))
            }
        }
    }

    /// Populates the cache once if it never was. Returns whether a snapshot exists.
    pub async fn ensure_populated(&self) -> bool {
        if self.snapshot.read().await.is_some() {
            return true;
        }

        let _writer = self.writer.lock().await;
        // 待機中に別のタスクが取得済みの可能性がある
        if self.snapshot.read().await.is_some() {
            return true;
        }
        self.refresh_locked().await.is_ok()
    }

    /// Looks up a key, populating the cache first if needed.
    pub async fn lookup(&self, key: &str) -> Option<LookupHit> {
        if !self.ensure_populated().await {
            return None;
        }
        self.snapshot().await?.lookup(key)
    }

    /// Creates `key` remotely, then patches it into the snapshot.
    ///
    /// Nothing local changes unless every remote call succeeded.
    ///
    /// # Errors
    /// - `CacheError::InvalidKey`: empty key, or empty segment in translations mode
    /// - `CacheError::MissingText`: translations mode without text
    /// - `CacheError::Write`: a remote call failed
    pub async fn create(&self, key: &str, text: Option<&str>) -> Result<(), CacheError> {
        let valid = match self.mode {
            CacheMode::Keys => !key.is_empty(),
            CacheMode::Translations => split_key(key).is_some(),
        };
        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        let text = text.filter(|text| !text.is_empty());
        if self.mode == CacheMode::Translations && text.is_none() {
            return Err(CacheError::MissingText(key.to_string()));
        }

        let _writer = self.writer.lock().await;

        self.store.create_asset(key, DEFAULT_ASSET_VALUE).await.map_err(|error| {
            tracing::warn!(key, %error, "Failed to create asset");
            CacheError::Write(error)
        })?;

        if let Some(text) = text {
            self.store.set_translation(key, &self.language_code, text).await.map_err(|error| {
                tracing::warn!(key, %error, "Asset created but setting its translation failed");
                CacheError::Write(error)
            })?;
        }

        let mut guard = self.snapshot.write().await;
        let Some(current) = guard.as_ref() else {
            tracing::debug!(key, "Cache not populated yet, skipping local patch");
            return Ok(());
        };

        let mut patched = Snapshot::clone(current);
        match &mut patched {
            Snapshot::Keys(keys) => {
                keys.insert(key);
            }
            Snapshot::Translations(tree) => {
                tree.splice(key, text.unwrap_or(DEFAULT_ASSET_VALUE));
            }
        }
        *guard = Some(Arc::new(patched));

        tracing::info!(key, "Translation key created");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::test_utils::FakeStore;

    fn tree(json: &str) -> TranslationTree {
        serde_json::from_str(json).unwrap()
    }

    #[fixture]
    fn store() -> Arc<FakeStore> {
        let store = FakeStore::default();
        store.set_keys(["home.title", "home.body"]);
        store.set_locale("en", tree(r#"{ "a": { "b": "Hello" }, "title": "Title" }"#));
        Arc::new(store)
    }

    fn cache(store: &Arc<FakeStore>, mode: CacheMode) -> TranslationCache {
        TranslationCache::new(Arc::clone(store) as Arc<dyn RemoteStore>, mode, "en")
    }

    #[rstest]
    #[tokio::test]
    async fn key_set_lookup_after_refresh(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Keys);

        let summary = cache.refresh().await.unwrap();

        assert_eq!(summary.entries, 2);
        assert_eq!(cache.lookup("home.title").await, Some(LookupHit::Key));
        assert_eq!(cache.lookup("home.missing").await, None);
    }

    #[rstest]
    #[tokio::test]
    async fn tree_lookup_walks_dotted_keys(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Translations);

        assert_eq!(cache.lookup("a.b").await, Some(LookupHit::Text("Hello".to_string())));
        assert_eq!(cache.lookup("a.c").await, None);
        assert_eq!(cache.lookup("x.y").await, None);
        assert_eq!(cache.lookup("title.sub").await, None);
        assert_eq!(cache.lookup("").await, None);
    }

    #[rstest]
    #[tokio::test]
    async fn lookup_populates_lazily_once(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Translations);

        cache.lookup("a.b").await;
        cache.lookup("title").await;

        assert_eq!(store.export_calls(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn lookup_of_namespace(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Translations);

        let hit = cache.lookup("a").await.unwrap();

        assert_that!(hit.display_text(), some(eq(r#"{"b":"Hello"}"#)));
    }

    #[rstest]
    #[tokio::test]
    async fn create_patches_tree_without_refresh(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Translations);
        cache.refresh().await.unwrap();

        cache.create("new.key", Some("text")).await.unwrap();

        assert_eq!(cache.lookup("new.key").await, Some(LookupHit::Text("text".to_string())));
        assert_eq!(cache.lookup("a.b").await, Some(LookupHit::Text("Hello".to_string())));
        assert_eq!(store.export_calls(), 1);
        assert_that!(store.created_assets(), elements_are![eq("new.key")]);
    }

    #[rstest]
    #[tokio::test]
    async fn create_appends_to_key_set(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Keys);
        cache.refresh().await.unwrap();

        cache.create("settings.save", None).await.unwrap();

        assert_eq!(cache.lookup("settings.save").await, Some(LookupHit::Key));
        assert_eq!(store.translation_calls(), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_translation_leaves_cache_unchanged(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Translations);
        cache.refresh().await.unwrap();
        let before = cache.snapshot().await.unwrap();
        store.fail_set_translation(true);

        let result = cache.create("new.key", Some("text")).await;

        assert!(matches!(result, Err(CacheError::Write(_))));
        assert_that!(store.created_assets(), elements_are![eq("new.key")]);
        assert_eq!(cache.lookup("new.key").await, None);
        assert_eq!(*cache.snapshot().await.unwrap(), *before);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_asset_creation_leaves_cache_unchanged(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Keys);
        cache.refresh().await.unwrap();
        store.fail_create_asset(true);

        let result = cache.create("new.key", None).await;

        let Err(CacheError::Write(error)) = result else {
            panic!("expected write error, got {result:?}");
        };
        assert_that!(error.to_string(), contains_substring("HTTP 409"));
        assert_eq!(cache.lookup("new.key").await, None);
    }

    #[rstest]
    #[case::empty_id(CacheMode::Keys, "")]
    #[case::empty_key(CacheMode::Translations, "")]
    #[case::empty_segment(CacheMode::Translations, "a..b")]
    #[case::trailing_dot(CacheMode::Translations, "Done.")]
    #[tokio::test]
    async fn create_rejects_invalid_keys(
        store: Arc<FakeStore>,
        #[case] mode: CacheMode,
        #[case] key: &str,
    ) {
        let cache = cache(&store, mode);

        let result = cache.create(key, None).await;

        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
        assert_that!(store.created_assets(), is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn key_set_accepts_ids_with_dots_anywhere(store: Arc<FakeStore>) {
        store.set_keys(["Welcome.", "a..b"]);
        let cache = cache(&store, CacheMode::Keys);
        cache.refresh().await.unwrap();

        cache.create("Done.", None).await.unwrap();

        let snapshot = cache.snapshot().await.unwrap();
        assert_eq!(cache.lookup("Welcome.").await, Some(LookupHit::Key));
        assert_eq!(cache.lookup("a..b").await, Some(LookupHit::Key));
        assert_eq!(cache.lookup("Done.").await, Some(LookupHit::Key));
        assert!(snapshot.contains("Welcome."));
        assert!(!snapshot.contains("Welcome"));
        assert_that!(store.created_assets(), elements_are![eq("Done.")]);
    }

    #[rstest]
    #[tokio::test]
    async fn empty_remote_is_a_populated_snapshot(store: Arc<FakeStore>) {
        store.set_keys([]);
        let cache = cache(&store, CacheMode::Keys);

        let summary = cache.refresh().await.unwrap();

        assert_eq!(summary.entries, 0);
        assert!(cache.snapshot().await.unwrap().is_empty());
        assert!(cache.ensure_populated().await);
    }

    #[rstest]
    #[tokio::test]
    async fn tree_create_requires_text(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Translations);

        let result = cache.create("new.key", None).await;

        assert!(matches!(result, Err(CacheError::MissingText(_))));
        assert_that!(store.created_assets(), is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Translations);
        cache.refresh().await.unwrap();
        store.fail_fetch(true);

        let result = cache.refresh().await;

        assert!(matches!(result, Err(CacheError::Fetch(_))));
        assert_eq!(cache.lookup("a.b").await, Some(LookupHit::Text("Hello".to_string())));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_refresh_on_empty_cache_stays_empty(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Keys);
        store.fail_fetch(true);

        assert!(cache.refresh().await.is_err());
        assert!(!cache.ensure_populated().await);
        assert_that!(cache.snapshot().await, none());
        assert_eq!(cache.lookup("home.title").await, None);
    }

    #[rstest]
    #[tokio::test]
    async fn create_on_unpopulated_cache_does_not_patch(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Keys);

        cache.create("brand.new", None).await.unwrap();

        assert_that!(cache.snapshot().await, none());
    }

    #[rstest]
    #[tokio::test]
    async fn refresh_replaces_snapshot_wholesale(store: Arc<FakeStore>) {
        let cache = cache(&store, CacheMode::Keys);
        cache.refresh().await.unwrap();
        let old = cache.snapshot().await.unwrap();
        store.set_keys(["other.key"]);

        cache.refresh().await.unwrap();

        assert!(old.contains("home.title"));
        assert_eq!(cache.lookup("home.title").await, None);
        assert_eq!(cache.lookup("other.key").await, Some(LookupHit::Key));
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_creates_are_all_applied(store: Arc<FakeStore>) {
        let cache = Arc::new(cache(&store, CacheMode::Keys));
        cache.refresh().await.unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.create(&format!("key.{i}"), None).await })
            })
            .collect();
        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let snapshot = cache.snapshot().await.unwrap();
        assert!((0..8).all(|i| snapshot.contains(&format!("key.{i}"))));
    }
}
