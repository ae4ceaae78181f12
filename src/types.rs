//! Core types used throughout the project.

use tower_lsp::lsp_types;

/// A range in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRange {
    /// 開始位置
    pub start: SourcePosition,
    /// 終了位置
    pub end: SourcePosition,
}

impl From<lsp_types::Range> for SourceRange {
    fn from(range: lsp_types::Range) -> Self {
        Self { start: range.start.into(), end: range.end.into() }
    }
}

impl From<SourceRange> for lsp_types::Range {
    fn from(range: SourceRange) -> Self {
        Self { start: range.start.into(), end: range.end.into() }
    }
}

/// A position in source code (0-indexed, UTF-16 columns as LSP expects).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    /// 行番号
    pub line: u32,
    /// UTF-16 列番号
    pub character: u32,
}

impl From<lsp_types::Position> for SourcePosition {
    fn from(position: lsp_types::Position) -> Self {
        Self { line: position.line, character: position.character }
    }
}

impl From<SourcePosition> for lsp_types::Position {
    fn from(position: SourcePosition) -> Self {
        Self { line: position.line, character: position.character }
    }
}

/// A byte range into a document's text. `end` is exclusive for slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// 開始オフセット
    pub start: usize,
    /// 終了オフセット
    pub end: usize,
}

impl ByteRange {
    /// Creates a range from `start` to `end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Checks if a byte offset is within this range (both ends inclusive,
    /// so a cursor right after the closing quote still hits the key).
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

impl SourcePosition {
    /// Converts a byte offset into a line / UTF-16 column position.
    ///
    /// Offsets past the end of `text` are clamped to the end.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // ソースファイルの行・列が42億を超えることはない
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut line = 0u32;
        let mut character = 0u32;

        for (index, ch) in text.char_indices() {
            if index >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                character = 0;
            } else {
                character += ch.len_utf16() as u32;
            }
        }

        Self { line, character }
    }

    /// Converts this position back into a byte offset.
    ///
    /// Characters past the end of a line clamp to the line end; lines past
    /// the end of the document clamp to the document end.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_offset(self, text: &str) -> usize {
        let mut line = 0u32;
        let mut character = 0u32;

        for (index, ch) in text.char_indices() {
            if line == self.line && (character >= self.character || ch == '\n') {
                return index;
            }
            if ch == '\n' {
                line += 1;
                character = 0;
            } else if line == self.line {
                character += ch.len_utf16() as u32;
            }
        }

        text.len()
    }
}

impl SourceRange {
    /// Builds a position range from a byte range of `text`.
    #[must_use]
    pub fn from_byte_range(text: &str, range: ByteRange) -> Self {
        Self {
            start: SourcePosition::from_offset(text, range.start),
            end: SourcePosition::from_offset(text, range.end),
        }
    }
}
