//! src/wordcount.rs
use crate::engine::KeyValue;
use fnv::FnvHasher;
use std::collections::HashMap;
use std::hash::Hasher;

/// Map callback: tokenizes one fragment into lower-cased alphanumeric runs
/// and emits one pair per distinct word with its local count. Empty keys are
/// never emitted; output order is unspecified.
pub fn map_words(input: &[u8]) -> Vec<KeyValue> {
    let text = String::from_utf8_lossy(input).to_lowercase();

    let mut counts: HashMap<&str, u64> = HashMap::new();
    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if !word.is_empty() {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(word, count)| KeyValue::new(word, &count.to_string()))
        .collect()
}

/// Reduce callback: sums the partial counts per key and re-encodes the
/// totals. A value that fails integer parsing counts as a single occurrence;
/// source input may carry non-numeric sentinel values. The result is
/// independent of input order and of how the input was batched.
pub fn reduce_counts(pairs: Vec<KeyValue>) -> Vec<KeyValue> {
    let mut totals: HashMap<String, u64> = HashMap::new();
    for pair in pairs {
        let count: u64 = pair.value.parse().unwrap_or(1);
        *totals.entry(pair.key).or_insert(0) += count;
    }

    totals
        .into_iter()
        .map(|(word, total)| KeyValue::new(&word, &total.to_string()))
        .collect()
}

/// Shuffle callback: routes a word to one of `reduce_jobs` reducers via an
/// FNV-1a hash of its raw bytes, truncated to 32 bits. Pure and
/// deterministic, so every occurrence of a word reaches the same reducer.
pub fn shuffle(key: &str, reduce_jobs: u32) -> u32 {
    let mut hasher = FnvHasher::default();
    hasher.write(key.as_bytes());
    (hasher.finish() as u32) % reduce_jobs
}
