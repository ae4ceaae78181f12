//! IDE features module.

pub mod backend;
pub mod code_actions;
pub mod diagnostics;
pub mod engine;
mod handlers;
pub mod hover;
pub mod inlay_hints;
pub mod state;
