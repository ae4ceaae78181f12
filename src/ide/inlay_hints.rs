//! Inline translation display after key literals.

use tower_lsp::lsp_types::{
    InlayHint,
    InlayHintKind,
    InlayHintLabel,
    InlayHintTooltip,
    Position,
    Range,
};

use crate::cache::Snapshot;
use crate::syntax::ExtractedKey;
use crate::types::SourcePosition;

/// 省略記号
const ELLIPSIS: char = '…';

/// Inlay hints for every found key with a displayable translation.
///
/// Only keys whose literal ends inside `range` are included. Keys mode has no
/// text to show, so it yields no hints.
#[must_use]
pub fn generate_inlay_hints(
    text: &str,
    keys: &[ExtractedKey],
    snapshot: &Snapshot,
    range: Range,
    max_length: usize,
) -> Vec<InlayHint> {
    keys.iter()
        .filter_map(|key| {
            let position: Position = SourcePosition::from_offset(text, key.end_offset).into();
            if position < range.start || position > range.end {
                return None;
            }

            let translation = snapshot.lookup(&key.value)?.display_text()?;

            Some(InlayHint {
                position,
                label: InlayHintLabel::String(format!(" {}", truncate(&translation, max_length))),
                kind: Some(InlayHintKind::TYPE),
                text_edits: None,
                tooltip: Some(InlayHintTooltip::String(translation)),
                padding_left: None,
                padding_right: None,
                data: None,
            })
        })
        .collect()
}

/// Cuts `text` to `max_length` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_length).collect();
    truncated.push(ELLIPSIS);
    truncated
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::cache::{
        KeySet,
        TranslationTree,
    };
    use crate::syntax::analyzer::extractor::extract_keys;

    const SOURCE: &str = "t('home.title');\nt('home');\nt('nope');\n";

    fn keys() -> Vec<ExtractedKey> {
        extract_keys(SOURCE, &tree_sitter_javascript::LANGUAGE.into(), "t").unwrap()
    }

    fn label_text(hint: &InlayHint) -> String {
        match &hint.label {
            InlayHintLabel::String(text) => text.clone(),
            InlayHintLabel::LabelParts(_) => panic!("expected a plain label"),
        }
    }

    fn tooltip_text(hint: &InlayHint) -> String {
        match &hint.tooltip {
            Some(InlayHintTooltip::String(text)) => text.clone(),
            other => panic!("expected a plain tooltip, got {other:?}"),
        }
    }

    fn whole_document() -> Range {
        Range { start: Position::new(0, 0), end: Position::new(3, 0) }
    }

    #[fixture]
    fn snapshot() -> Snapshot {
        let tree: TranslationTree =
            serde_json::from_str(r#"{ "home": { "title": "Welcome home" } }"#).unwrap();
        Snapshot::Translations(tree)
    }

    #[rstest]
    fn hints_follow_found_literals(snapshot: Snapshot) {
        let hints = generate_inlay_hints(SOURCE, &keys(), &snapshot, whole_document(), 40);

        assert_that!(hints, len(eq(2)));
        assert_eq!(hints[0].position, Position::new(0, 14));
        assert_eq!(label_text(&hints[0]), " Welcome home");
        assert_eq!(label_text(&hints[1]), " {\"title\":\"Welcome home\"}");
    }

    #[rstest]
    fn long_translations_are_truncated_but_tooltip_is_full(snapshot: Snapshot) {
        let hints = generate_inlay_hints(SOURCE, &keys(), &snapshot, whole_document(), 7);

        assert_eq!(label_text(&hints[0]), " Welcome…");
        assert_eq!(tooltip_text(&hints[0]), "Welcome home");
    }

    #[rstest]
    fn hints_outside_range_are_skipped(snapshot: Snapshot) {
        let range = Range { start: Position::new(1, 0), end: Position::new(1, 20) };

        let hints = generate_inlay_hints(SOURCE, &keys(), &snapshot, range, 40);

        assert_that!(hints, len(eq(1)));
        assert_eq!(hints[0].position.line, 1);
    }

    #[rstest]
    fn keys_mode_has_no_hints() {
        let snapshot = Snapshot::Keys(["home.title"].into_iter().collect::<KeySet>());

        let hints = generate_inlay_hints(SOURCE, &keys(), &snapshot, whole_document(), 40);

        assert_that!(hints, is_empty());
    }

    #[rstest]
    #[case::short("abc", 5, "abc")]
    #[case::exact("abcde", 5, "abcde")]
    #[case::long("abcdef", 5, "abcde…")]
    #[case::multibyte("ようこそ", 2, "よう…")]
    fn truncate_counts_characters(#[case] text: &str, #[case] max: usize, #[case] expected: &str) {
        assert_that!(truncate(text, max), eq(expected));
    }
}
