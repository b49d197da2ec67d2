use serde_json::{Map, Value};

use super::index::FlattenedIndex;

/// Action taken on a key by [`DictionaryTree::set_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Added,
    Updated,
}

impl KeyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAction::Added => "added",
            KeyAction::Updated => "updated",
        }
    }
}

/// Nested key/value structure backing one locale file.
///
/// Leaves are strings, intermediate nodes are objects. Key order is the
/// insertion order of the underlying map (`serde_json` is built with
/// `preserve_order`), which is also the order every traversal follows.
/// Values of other JSON types are carried through load/save untouched but are
/// invisible to lookups and flattening.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictionaryTree {
    root: Map<String, Value>,
}

impl DictionaryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a parsed value. Returns `None` unless the root is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) => Some(Self { root }),
            _ => None,
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of string leaves reachable from the root.
    pub fn leaf_count(&self) -> usize {
        fn count(map: &Map<String, Value>) -> usize {
            map.values()
                .map(|value| match value {
                    Value::String(_) => 1,
                    Value::Object(inner) => count(inner),
                    _ => 0,
                })
                .sum()
        }
        count(&self.root)
    }

    /// Look up the string leaf at a dotted key path.
    ///
    /// Returns `None` for invalid keys, missing paths and non-string leaves.
    pub fn get_path(&self, key: &str) -> Option<&str> {
        self.get_value(key).and_then(Value::as_str)
    }

    /// Any node (leaf of any type or object) at a dotted key path.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        let parts = split_key(key)?;
        let (last, parents) = parts.split_last()?;

        let mut current = &self.root;
        for part in parents {
            match current.get(*part) {
                Some(Value::Object(inner)) => current = inner,
                _ => return None,
            }
        }
        current.get(*last)
    }

    /// Set a string leaf at a dotted key path.
    ///
    /// Creates intermediate objects as needed and replaces a non-object
    /// intermediate node with an object. Returns `None` (and changes nothing)
    /// when the key is empty or has an empty segment.
    pub fn set_path(&mut self, key: &str, value: impl Into<String>) -> Option<KeyAction> {
        let parts = split_key(key)?;
        Some(insert_nested(
            &mut self.root,
            &parts,
            Value::String(value.into()),
        ))
    }

    /// Remove the leaf at a dotted key path, returning its string value.
    ///
    /// Intermediate objects left empty by the removal are kept.
    pub fn remove_path(&mut self, key: &str) -> Option<String> {
        let parts = split_key(key)?;
        let (last, parents) = parts.split_last()?;

        let mut current = &mut self.root;
        for part in parents {
            match current.get_mut(*part) {
                Some(Value::Object(inner)) => current = inner,
                _ => return None,
            }
        }
        match current.get(*last) {
            Some(Value::String(_)) => match current.shift_remove(*last) {
                Some(Value::String(s)) => Some(s),
                _ => None,
            },
            _ => None,
        }
    }

    /// Depth-first flatten into a dotted-key index.
    pub fn flatten(&self) -> FlattenedIndex {
        let mut index = FlattenedIndex::default();
        flatten_into(&self.root, "", &mut index);
        index
    }

    /// Find the first dotted key whose leaf equals `value`.
    ///
    /// Traversal is depth-first in insertion order; when the same value lives
    /// under several keys only the first one visited is returned.
    pub fn find_key_by_value(&self, value: &str) -> Option<String> {
        find_in(&self.root, "", value)
    }
}

/// Split a dotted key, rejecting empty keys and empty segments.
fn split_key(key: &str) -> Option<Vec<&str>> {
    if key.is_empty() {
        return None;
    }
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|part| part.is_empty()) {
        return None;
    }
    Some(parts)
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Insert a value at a nested path, creating intermediate objects as needed
fn insert_nested(root: &mut Map<String, Value>, path: &[&str], value: Value) -> KeyAction {
    let Some((first, rest)) = path.split_first() else {
        return KeyAction::Added; // Edge case: empty path
    };

    if rest.is_empty() {
        // Final key - insert the value
        let action = if root.contains_key(*first) {
            KeyAction::Updated
        } else {
            KeyAction::Added
        };
        root.insert(first.to_string(), value);
        return action;
    }

    // Navigate/create intermediate objects
    let next_level = root
        .entry(first.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    // If the existing value is not an object, replace it with an object
    if !next_level.is_object() {
        *next_level = Value::Object(Map::new());
    }

    match next_level {
        Value::Object(inner) => insert_nested(inner, rest, value),
        _ => KeyAction::Added,
    }
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, index: &mut FlattenedIndex) {
    for (key, value) in map {
        match value {
            Value::String(s) => index.insert_if_absent(join_key(prefix, key), s.clone()),
            Value::Object(inner) => flatten_into(inner, &join_key(prefix, key), index),
            // Arrays, numbers, booleans and null are not translatable leaves
            _ => {}
        }
    }
}

fn find_in(map: &Map<String, Value>, prefix: &str, needle: &str) -> Option<String> {
    for (key, value) in map {
        match value {
            Value::String(s) if s == needle => return Some(join_key(prefix, key)),
            Value::Object(inner) => {
                if let Some(found) = find_in(inner, &join_key(prefix, key), needle) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}
