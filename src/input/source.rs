//! Source file input definitions.

use std::path::Path;

/// An open document as a salsa input.
#[salsa::input]
pub struct SourceFile {
    /// ドキュメント URI
    #[returns(ref)]
    pub uri: String,

    /// 最新のテキスト
    #[returns(ref)]
    pub text: String,

    /// 解析に使う文法
    pub language: ProgrammingLanguage,
}

/// Supported programming languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProgrammingLanguage {
    /// `.js`, `.mjs`, `.cjs`
    JavaScript,
    /// `.jsx`
    Jsx,
    /// `.ts`, `.mts`, `.cts`
    TypeScript,
    /// Also the fallback: the TSX grammar accepts module syntax, type
    /// annotations, JSX and decorators at once.
    #[default]
    Tsx,
}

impl ProgrammingLanguage {
    /// Infers the programming language from file extension.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        let file_path = Path::new(uri);
        match file_path.extension().and_then(|ext| ext.to_str()) {
            Some("tsx") => Some(Self::Tsx),
            Some("ts" | "mts" | "cts") => Some(Self::TypeScript),
            Some("jsx") => Some(Self::Jsx),
            Some("js" | "mjs" | "cjs") => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Maps an LSP `languageId` to a language.
    #[must_use]
    pub fn from_language_id(language_id: &str) -> Option<Self> {
        match language_id {
            "typescriptreact" => Some(Self::Tsx),
            "typescript" => Some(Self::TypeScript),
            "javascriptreact" => Some(Self::Jsx),
            "javascript" => Some(Self::JavaScript),
            _ => None,
        }
    }

    /// Resolves the grammar for a document: `languageId` first, then the URI
    /// extension, then the permissive default.
    #[must_use]
    pub fn detect(language_id: &str, uri: &str) -> Self {
        Self::from_language_id(language_id).or_else(|| Self::from_uri(uri)).unwrap_or_default()
    }

    /// The LSP `languageId` of this language.
    #[must_use]
    pub const fn language_id(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Jsx => "javascriptreact",
            Self::TypeScript => "typescript",
            Self::Tsx => "typescriptreact",
        }
    }

    /// Tree-sitter grammar for this language.
    #[must_use]
    pub fn tree_sitter_language(&self) -> tree_sitter::Language {
        match self {
            Self::JavaScript | Self::Jsx => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}
