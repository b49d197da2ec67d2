use indexmap::IndexMap;

use super::tree::DictionaryTree;

/// Read-only dotted-key → string view of one or more dictionary trees.
///
/// Built once per tree state; there is no incremental update, so rebuild it
/// after the tree changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedIndex {
    entries: IndexMap<String, String>,
}

impl FlattenedIndex {
    /// Merge several trees. On duplicate keys the earlier tree wins.
    pub fn merged<'a>(trees: impl IntoIterator<Item = &'a DictionaryTree>) -> Self {
        let mut index = Self::default();
        for tree in trees {
            for (key, value) in tree.flatten().entries {
                index.insert_if_absent(key, value);
            }
        }
        index
    }

    pub(crate) fn insert_if_absent(&mut self, key: String, value: String) {
        self.entries.entry(key).or_insert(value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// First key (in flatten order) whose value equals `value`.
    pub fn key_of(&self, value: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, v)| v.as_str() == value)
            .map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebuild a nested tree by repeated `set_path`.
    ///
    /// Every string leaf is reproduced; empty intermediate objects of the
    /// original tree are not.
    pub fn to_tree(&self) -> DictionaryTree {
        let mut tree = DictionaryTree::new();
        for (key, value) in &self.entries {
            tree.set_path(key, value.as_str());
        }
        tree
    }
}
