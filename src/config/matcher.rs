//! Decides which documents are scanned.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};

use super::LocoSettings;
use crate::input::source::ProgrammingLanguage;

/// Errors while compiling exclude patterns.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// A single pattern does not compile
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        /// 元のパターン
        pattern: String,
        /// globset のエラー
        #[source]
        source: globset::Error,
    },

    /// The combined set does not build
    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Matches documents against `targetLanguages` and `excludePatterns`.
#[derive(Debug, Clone)]
pub struct DocumentFilter {
    workspace_root: Option<PathBuf>,
    target_languages: Vec<String>,
    exclude_set: GlobSet,
}

impl DocumentFilter {
    /// Creates a new filter from settings.
    pub fn new(
        workspace_root: Option<PathBuf>,
        settings: &LocoSettings,
    ) -> Result<Self, MatcherError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &settings.exclude_patterns {
            let glob = Glob::new(pattern).map_err(|source| MatcherError::InvalidExcludePattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }

        Ok(Self {
            workspace_root,
            target_languages: settings.target_languages.clone(),
            exclude_set: builder.build()?,
        })
    }

    /// Returns true if the document's language is targeted.
    ///
    /// The client's `languageId` is checked first; a document whose id is not
    /// listed still qualifies when its extension maps to a listed language.
    #[must_use]
    pub fn is_target_language(&self, language_id: &str, uri: &str) -> bool {
        let listed = |id: &str| self.target_languages.iter().any(|target| target == id);

        listed(language_id)
            || ProgrammingLanguage::from_uri(uri).is_some_and(|lang| listed(lang.language_id()))
    }

    /// Returns true if the path matches `excludePatterns`.
    ///
    /// Paths under the workspace root are matched relative to it.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        let relative = self
            .workspace_root
            .as_deref()
            .and_then(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);

        self.exclude_set.is_match(relative) || self.exclude_set.is_match(path)
    }

    /// Returns true if the document should be scanned.
    #[must_use]
    pub fn accepts(&self, language_id: &str, uri: &str, path: Option<&Path>) -> bool {
        self.is_target_language(language_id, uri) && !path.is_some_and(|path| self.is_excluded(path))
    }
}
