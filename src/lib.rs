//! loco-i18n-language-server
//!
//! JavaScript/TypeScript の翻訳キーを Loco プロジェクトと照合する Language Server Protocol (LSP) 実装

pub mod cache;
pub mod config;
pub mod db;
pub mod ide;
pub mod input;
pub mod remote;
pub mod syntax;
pub mod types;

#[cfg(test)]
mod test_utils;

// Backend を再エクスポート
pub use ide::backend::Backend;
