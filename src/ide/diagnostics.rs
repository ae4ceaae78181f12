//! 診断メッセージ生成モジュール

use serde_json::json;
use tower_lsp::lsp_types::{
    Diagnostic,
    DiagnosticSeverity,
    NumberOrString,
};

use crate::cache::Snapshot;
use crate::syntax::ExtractedKey;
use crate::types::{
    ByteRange,
    SourceRange,
};

/// `Diagnostic.source` of every diagnostic this server publishes.
pub const DIAGNOSTIC_SOURCE: &str = "loco-i18n";

/// `Diagnostic.code` of a key missing from the remote store.
pub const MISSING_KEY_CODE: &str = "missing-key";

/// One extracted key checked against a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    /// Key value
    pub key: String,
    /// Literal range, delimiters included
    pub range: ByteRange,
    /// Whether the snapshot has the key
    pub present: bool,
}

/// Joins scanned keys with a snapshot, one record per key in document order.
#[must_use]
pub fn reconcile(keys: &[ExtractedKey], snapshot: &Snapshot) -> Vec<DiagnosticRecord> {
    keys.iter()
        .map(|key| DiagnosticRecord {
            key: key.value.clone(),
            range: key.range(),
            present: snapshot.contains(&key.value),
        })
        .collect()
}

/// Converts records into LSP diagnostics (missing keys only).
///
/// `stale` carries the reason when the records come from an earlier scan.
#[must_use]
pub fn to_lsp_diagnostics(
    records: &[DiagnosticRecord],
    text: &str,
    stale: Option<&str>,
) -> Vec<Diagnostic> {
    records
        .iter()
        .filter(|record| !record.present)
        .map(|record| {
            let message = match stale {
                Some(reason) => {
                    format!("Missing translation key: \"{}\" (stale: {reason})", record.key)
                }
                None => format!("Missing translation key: \"{}\"", record.key),
            };

            Diagnostic {
                range: SourceRange::from_byte_range(text, record.range).into(),
                severity: Some(DiagnosticSeverity::WARNING),
                code: Some(NumberOrString::String(MISSING_KEY_CODE.to_string())),
                code_description: None,
                source: Some(DIAGNOSTIC_SOURCE.to_string()),
                message,
                related_information: None,
                tags: None,
                data: Some(json!({ "key": record.key })),
            }
        })
        .collect()
}

/// Returns the key of a diagnostic published for a missing key.
#[must_use]
pub fn missing_key_of(diagnostic: &Diagnostic) -> Option<&str> {
    if diagnostic.source.as_deref() != Some(DIAGNOSTIC_SOURCE) {
        return None;
    }
    if !matches!(&diagnostic.code, Some(NumberOrString::String(code)) if code == MISSING_KEY_CODE)
    {
        return None;
    }
    diagnostic.data.as_ref()?.get("key")?.as_str()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use tower_lsp::lsp_types::{
        Position,
        Range,
    };

    use super::*;
    use crate::cache::{
        KeySet,
        TranslationTree,
    };
    use crate::syntax::analyzer::extractor::extract_keys;

    const SOURCE: &str = "const a = t(\"common.hello\");\nconst b = t('common.missing');\n";

    fn keys() -> Vec<ExtractedKey> {
        extract_keys(SOURCE, &tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(), "t").unwrap()
    }

    #[fixture]
    fn snapshot() -> Snapshot {
        let tree: TranslationTree =
            serde_json::from_str(r#"{ "common": { "hello": "Hello" } }"#).unwrap();
        Snapshot::Translations(tree)
    }

    #[rstest]
    fn reconcile_marks_presence_in_order(snapshot: Snapshot) {
        let records = reconcile(&keys(), &snapshot);

        assert_that!(
            records,
            elements_are![
                all![
                    field!(DiagnosticRecord.key, eq("common.hello")),
                    field!(DiagnosticRecord.present, eq(&true))
                ],
                all![
                    field!(DiagnosticRecord.key, eq("common.missing")),
                    field!(DiagnosticRecord.present, eq(&false))
                ]
            ]
        );
    }

    #[rstest]
    fn reconcile_against_key_set() {
        let snapshot = Snapshot::Keys(["common.missing"].into_iter().collect::<KeySet>());

        let records = reconcile(&keys(), &snapshot);

        assert_eq!(records.iter().map(|r| r.present).collect::<Vec<_>>(), vec![false, true]);
    }

    #[rstest]
    fn namespace_keys_count_as_present(snapshot: Snapshot) {
        let keys = vec![ExtractedKey::new("common", ByteRange::new(0, 8))];

        let records = reconcile(&keys, &snapshot);

        assert!(records[0].present);
    }

    #[googletest::test]
    fn missing_records_become_warnings() {
        let records = reconcile(&keys(), &snapshot());

        let diagnostics = to_lsp_diagnostics(&records, SOURCE, None);

        assert_that!(diagnostics, len(eq(1)));
        let diagnostic = &diagnostics[0];
        assert_eq!(diagnostic.message, "Missing translation key: \"common.missing\"");
        assert_eq!(diagnostic.severity, Some(DiagnosticSeverity::WARNING));
        assert_eq!(diagnostic.source.as_deref(), Some(DIAGNOSTIC_SOURCE));
        assert_eq!(
            diagnostic.range,
            Range {
                start: Position { line: 1, character: 12 },
                end: Position { line: 1, character: 28 }
            }
        );
        assert_eq!(missing_key_of(diagnostic), Some("common.missing"));
    }

    #[googletest::test]
    fn stale_diagnostics_carry_reason() {
        let records = reconcile(&keys(), &snapshot());

        let diagnostics = to_lsp_diagnostics(&records, SOURCE, Some("Syntax error at line 3"));

        expect_that!(
            diagnostics,
            elements_are![field!(
                Diagnostic.message,
                ends_with("(stale: Syntax error at line 3)")
            )]
        );
    }

    #[rstest]
    fn missing_key_of_ignores_foreign_diagnostics() {
        let diagnostic = Diagnostic {
            source: Some("eslint".to_string()),
            code: Some(NumberOrString::String(MISSING_KEY_CODE.to_string())),
            data: Some(json!({ "key": "x" })),
            ..Diagnostic::default()
        };

        assert_that!(missing_key_of(&diagnostic), none());
    }
}
