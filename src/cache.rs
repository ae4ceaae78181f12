//! Local copy of the remote translation state.

mod key_set;
mod translation_cache;
mod tree;

pub use key_set::KeySet;
pub use translation_cache::{
    CacheError,
    CacheMode,
    LookupHit,
    RefreshSummary,
    Snapshot,
    TranslationCache,
};
pub use tree::{
    TranslationNode,
    TranslationTree,
    split_key,
};
