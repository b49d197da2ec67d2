use serde::{Deserialize, Serialize};
use serde_json::Value;
use xxhash_rust::xxh3::xxh3_64;

use crate::core::dictionary::DictionaryTree;

/// Maximum number of words kept in a translated slug.
pub const MAX_SLUG_WORDS: usize = 6;

/// How new keys are derived from source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyPolicy {
    /// Short content digest: `prefix.1a2b3c4d`.
    #[default]
    Hash,
    /// Slug of the text translated into the neutral language: `prefix.remote_open`.
    Translate,
}

/// Join a key prefix and a leaf segment with `.`.
pub fn prefixed(prefix: &str, leaf: &str) -> String {
    let prefix = prefix.trim_matches('.');
    if prefix.is_empty() {
        leaf.to_string()
    } else {
        format!("{}.{}", prefix, leaf)
    }
}

/// First 8 hex characters of the xxh3 digest of `text`, under `prefix`.
pub fn hash_key(prefix: &str, text: &str) -> String {
    let digest = xxh3_64(text.as_bytes());
    prefixed(prefix, &format!("{:08x}", (digest >> 32) as u32))
}

/// Lowercase ASCII words of `text` joined by `_`.
///
/// Returns an empty string when nothing usable is left.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .take(MAX_SLUG_WORDS)
        .collect::<Vec<_>>()
        .join("_")
}

/// Make `key` safe to write `text` under in `tree`.
///
/// A free key, or one already holding `text`, is returned as is. Otherwise
/// `_2`, `_3`, ... is appended to the last segment until a usable key is found.
pub fn disambiguate(key: &str, text: &str, tree: &DictionaryTree) -> String {
    let usable = |candidate: &str| match tree.get_value(candidate) {
        None => true,
        Some(Value::String(existing)) => existing == text,
        Some(_) => false,
    };
    if usable(key) {
        return key.to_string();
    }
    (2..)
        .map(|n| format!("{}_{}", key, n))
        .find(|candidate| usable(candidate.as_str()))
        .unwrap_or_else(|| key.to_string())
}
