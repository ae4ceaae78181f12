//! Tree-sitter based key extraction.

pub mod extractor;
pub mod literal;
pub mod matcher;
pub mod types;
