//! Types for the analyzer module

use thiserror::Error;

use crate::types::ByteRange;

/// A translation key passed as a static string literal to the translation function.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtractedKey {
    /// Decoded literal text (escape sequences resolved)
    pub value: String,
    /// Byte offset of the opening delimiter
    pub start_offset: usize,
    /// Byte offset just past the closing delimiter
    pub end_offset: usize,
}

impl ExtractedKey {
    /// Creates a key spanning `range`.
    #[must_use]
    pub fn new(value: impl Into<String>, range: ByteRange) -> Self {
        Self { value: value.into(), start_offset: range.start, end_offset: range.end }
    }

    /// Range of the literal, delimiters included.
    #[must_use]
    pub const fn range(&self) -> ByteRange {
        ByteRange::new(self.start_offset, self.end_offset)
    }
}

/// 呼び出し式の呼び出し対象
///
/// 名前解決は行わず、構文上の形だけで分類します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callee<'a> {
    /// 単純な識別子 (e.g., `t("key")`, `(t)("key")`)
    Identifier(&'a str),
    /// メンバーアクセス (e.g., `i18n.t("key")`)
    Member {
        /// アクセスされるプロパティ名
        property: &'a str,
    },
    /// それ以外 (e.g., `getT()("key")`, `(0, t)("key")`)
    Other,
}

/// 呼び出し式の引数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// 静的な文字列リテラル（補間なしのテンプレートリテラルを含む）
    StringLiteral {
        /// デコード済みの文字列
        value: String,
        /// 区切り文字を含むリテラル全体の範囲
        range: ByteRange,
    },
    /// それ以外の式
    Other,
}

/// A call expression lowered out of the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// 呼び出し対象
    pub callee: Callee<'a>,
    /// 引数（コメントを除く）
    pub args: Vec<Argument>,
}

/// Errors that abort a scan. A failed scan never yields a partial key list.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScanError {
    /// Error when failing to set the language for the parser
    #[error("Failed to set language for parser: {0}")]
    LanguageSetup(String),
    /// Error when the parser gives up on the source
    #[error("Failed to parse source code")]
    ParseFailed,
    /// The document contains a syntax error (1-based position)
    #[error("Syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },
}
