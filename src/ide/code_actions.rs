//! Code action generation for missing translation keys

use serde_json::Value;
use tower_lsp::lsp_types::{
    CodeAction,
    CodeActionKind,
    CodeActionOrCommand,
    Command,
    Diagnostic,
};

use crate::ide::diagnostics::missing_key_of;

/// Creates a key in the remote store: `[key, text?]`.
pub const CREATE_TRANSLATION_COMMAND: &str = "loco-i18n.createTranslation";

/// Refreshes the cache and rescans open documents.
pub const REFRESH_TRANSLATIONS_COMMAND: &str = "loco-i18n.refreshLocalTranslations";

/// One quick fix per missing-key diagnostic.
#[must_use]
pub fn generate_code_actions(diagnostics: &[Diagnostic]) -> Vec<CodeActionOrCommand> {
    diagnostics
        .iter()
        .filter_map(|diagnostic| {
            let key = missing_key_of(diagnostic)?;
            let title = format!("Create translation key: \"{key}\"");

            Some(CodeActionOrCommand::CodeAction(CodeAction {
                title: title.clone(),
                kind: Some(CodeActionKind::QUICKFIX),
                diagnostics: Some(vec![diagnostic.clone()]),
                edit: None,
                command: Some(Command {
                    title,
                    command: CREATE_TRANSLATION_COMMAND.to_string(),
                    arguments: Some(vec![Value::String(key.to_string())]),
                }),
                is_preferred: Some(true),
                disabled: None,
                data: None,
            }))
        })
        .collect()
}
