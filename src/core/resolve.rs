use serde::Serialize;

use crate::core::{candidate::Candidate, dictionary::DictionaryTree};

/// An existing key found for a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedKey {
    pub key: String,
    /// Position of the matching dictionary in the list passed to [`resolve`].
    pub dictionary: usize,
}

/// Find an existing key for `text` across dictionaries, in the caller's order.
///
/// The exact text is tried first; when it misses and trimming changes the
/// text, the trimmed text is tried too.
pub fn resolve_text(text: &str, dictionaries: &[&DictionaryTree]) -> Option<ResolvedKey> {
    find(text, dictionaries).or_else(|| {
        let trimmed = text.trim();
        (trimmed != text && !trimmed.is_empty())
            .then(|| find(trimmed, dictionaries))
            .flatten()
    })
}

pub fn resolve(candidate: &Candidate, dictionaries: &[&DictionaryTree]) -> Option<ResolvedKey> {
    resolve_text(&candidate.text, dictionaries)
}

/// Set `i18n_key` on every candidate that resolves. Returns how many did.
pub fn resolve_all(candidates: &mut [Candidate], dictionaries: &[&DictionaryTree]) -> usize {
    let mut resolved = 0;
    for candidate in candidates.iter_mut() {
        if let Some(hit) = resolve(candidate, dictionaries) {
            candidate.i18n_key = Some(hit.key);
            resolved += 1;
        }
    }
    resolved
}

fn find(text: &str, dictionaries: &[&DictionaryTree]) -> Option<ResolvedKey> {
    dictionaries
        .iter()
        .enumerate()
        .find_map(|(dictionary, tree)| {
            tree.find_key_by_value(text)
                .map(|key| ResolvedKey { key, dictionary })
        })
}
