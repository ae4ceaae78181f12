//! Nested translation tree as exported by the remote store.

use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};

/// Splits a dotted key into its segments.
///
/// Returns `None` for an empty key or a key with an empty segment
/// (`"a..b"`, `".a"`, `"a."`).
#[must_use]
pub fn split_key(key: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = key.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    Some(segments)
}

/// A node of the tree: a translation or a namespace of further keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationNode {
    /// Translation text
    Leaf(String),
    /// Keys below this segment
    Namespace(TranslationTree),
}

impl TranslationNode {
    /// Display form: a leaf as-is, a namespace as compact JSON.
    #[must_use]
    pub fn serialize(&self) -> String {
        match self {
            Self::Leaf(text) => text.clone(),
            Self::Namespace(tree) => serde_json::to_string(tree).unwrap_or_default(),
        }
    }
}

/// Mapping from key segment to [`TranslationNode`], in sorted key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslationTree(BTreeMap<String, TranslationNode>);

impl TranslationTree {
    /// Direct child of this level.
    #[must_use]
    pub fn get(&self, segment: &str) -> Option<&TranslationNode> {
        self.0.get(segment)
    }

    /// Whether this level has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of leaves in the whole tree.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.0
            .values()
            .map(|node| match node {
                TranslationNode::Leaf(_) => 1,
                TranslationNode::Namespace(tree) => tree.leaf_count(),
            })
            .sum()
    }

    /// Resolves a dotted key segment by segment.
    ///
    /// A missing segment, or a leaf where a namespace is needed, is "not found".
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&TranslationNode> {
        let segments = split_key(key)?;
        let (last, parents) = segments.split_last()?;

        let mut current = self;
        for segment in parents {
            match current.get(segment)? {
                TranslationNode::Namespace(tree) => current = tree,
                TranslationNode::Leaf(_) => return None,
            }
        }
        current.get(last)
    }

    /// Writes `text` at `key`, creating intermediate namespaces.
    ///
    /// The part of the path that does not exist yet is built as a staged
    /// subtree first and then attached in a single insertion. A leaf in the
    /// way is replaced by a namespace; a namespace at the final segment is
    /// replaced by the leaf. Returns `false` for an invalid key.
    pub fn splice(&mut self, key: &str, text: &str) -> bool {
        let Some(segments) = split_key(key) else {
            return false;
        };
        self.splice_segments(&segments, text);
        true
    }

    /// Recursive part of [`Self::splice`].
    fn splice_segments(&mut self, segments: &[&str], text: &str) {
        let Some((head, rest)) = segments.split_first() else {
            return;
        };

        if rest.is_empty() {
            self.0.insert((*head).to_string(), TranslationNode::Leaf(text.to_string()));
            return;
        }

        match self.0.get_mut(*head) {
            Some(TranslationNode::Namespace(tree)) => tree.splice_segments(rest, text),
            _ => {
                self.0.insert((*head).to_string(), stage(rest, text));
            }
        }
    }
}

/// Builds the detached subtree `rest[0] -> ... -> rest[n] = text`.
fn stage(rest: &[&str], text: &str) -> TranslationNode {
    rest.iter().rev().fold(TranslationNode::Leaf(text.to_string()), |child, segment| {
        TranslationNode::Namespace(TranslationTree(BTreeMap::from([(
            (*segment).to_string(),
            child,
        )])))
    })
}
