//! Flat asset id set used in keys mode.
//!
//! Ids are opaque: dots carry no structure, so `"Welcome."` and `"a..b"` are
//! ordinary ids.

use std::collections::HashSet;

/// Flat set of registered asset ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet(HashSet<String>);

impl KeySet {
    /// Whether `key` is registered, compared verbatim.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    /// Adds an id. Returns `false` if it was already present.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.0.insert(key.into())
    }

    /// Number of ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the remote project has no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
