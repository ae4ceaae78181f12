//! Hover implementation

use tower_lsp::lsp_types::{
    Hover,
    HoverContents,
    MarkupContent,
    MarkupKind,
};

use crate::cache::LookupHit;
use crate::syntax::ExtractedKey;
use crate::types::SourceRange;

/// キーのみのモードで表示するテキスト
const REGISTERED_LABEL: &str = "registered";

/// Markdown shown when hovering a found key.
#[must_use]
pub fn generate_hover_content(key: &str, hit: &LookupHit) -> String {
    let body = hit.display_text().unwrap_or_else(|| REGISTERED_LABEL.to_string());
    format!("**{key}**\n\n{body}")
}

/// Builds the hover for a key literal, ranged over the literal.
#[must_use]
pub fn hover_for_key(text: &str, key: &ExtractedKey, hit: &LookupHit) -> Hover {
    Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: generate_hover_content(&key.value, hit),
        }),
        range: Some(SourceRange::from_byte_range(text, key.range()).into()),
    }
}
