pub mod analyzer;

pub use analyzer::types::{
    ExtractedKey,
    ScanError,
};

use crate::db::I18nDatabase;
use crate::input::source::SourceFile;

/// Extracts the translation keys of a source file.
///
/// Memoized on the file text and the function name, so rescanning an
/// unchanged document does not reparse it.
#[salsa::tracked]
#[allow(clippy::needless_pass_by_value)] // Salsa tracked 関数では所有型が必要
pub fn analyze_source(
    db: &dyn I18nDatabase,
    file: SourceFile,
    function_name: String,
) -> Result<Vec<ExtractedKey>, ScanError> {
    let text = file.text(db);
    let language = file.language(db).tree_sitter_language();

    let result = analyzer::extractor::extract_keys(text, &language, &function_name);

    match &result {
        Ok(keys) => tracing::debug!(uri = %file.uri(db), keys = keys.len(), "Source analyzed"),
        Err(error) => tracing::debug!(uri = %file.uri(db), %error, "Source analysis failed"),
    }

    result
}

/// Finds the key whose literal covers a byte offset.
#[must_use]
pub fn key_at_offset(keys: &[ExtractedKey], offset: usize) -> Option<&ExtractedKey> {
    keys.iter().find(|key| key.range().contains(offset))
}
