//! Content fingerprinting and similarity.
//!
//! A fingerprint is a SHA-256 digest over the sorted set of "significant
//! words" in a document: whitespace tokens of at least four characters,
//! case-folded, minus a small stopword list. Reordering or duplicating words
//! never changes the fingerprint, which makes it a cheap near-duplicate
//! signal for the same article arriving under different URLs.

use std::collections::BTreeSet;

use sha2::{Digest, Sha256};

/// Words too common to carry signal.
const STOPWORDS: &[&str] = &[
    "and", "the", "for", "with", "this", "that", "from", "what", "have", "been",
];

/// Minimum token length for a word to count as significant.
const MIN_WORD_LEN: usize = 4;

/// Cap on the significant-word set. Oversized documents keep the
/// lexicographically first `MAX_WORDS`, so the cap is deterministic rather
/// than a sample.
const MAX_WORDS: usize = 1000;

/// Records sharing a fingerprint are merged only when their similarity
/// clears this threshold.
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

/// Extract the significant-word set from `text`, lower-cased and sorted.
pub fn significant_words(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    let words: BTreeSet<String> = lowered
        .split_whitespace()
        .filter(|word| word.chars().count() >= MIN_WORD_LEN)
        .filter(|word| !STOPWORDS.contains(word))
        .map(str::to_string)
        .collect();

    if words.len() <= MAX_WORDS {
        return words;
    }
    words.into_iter().take(MAX_WORDS).collect()
}

/// Fingerprint for `body` with an optional `title` mixed in.
///
/// Identical significant-word sets always yield identical fingerprints.
pub fn content_fingerprint(body: &str, title: &str) -> String {
    let combined = format!("{} {}", title, body);
    let joined = significant_words(&combined)
        .into_iter()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hex::encode(hasher.finalize())
}

/// Jaccard similarity over the two texts' significant-word sets, in
/// `[0.0, 1.0]`. Returns `0.0` when both sets are empty.
pub fn similarity(a: &str, b: &str) -> f64 {
    let words_a = significant_words(a);
    let words_b = significant_words(b);

    let union = words_a.union(&words_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    intersection as f64 / union as f64
}
