//! Document-frequency listings for collection reports.

use crate::index::InvertedIndex;
use serde::Serialize;
use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermFrequency {
    pub term: String,
    pub doc_freq: u32,
}

/// The `k` terms with the highest document frequency. Ties are broken by term.
pub fn highest_doc_freq(index: &InvertedIndex, k: usize) -> Vec<TermFrequency> {
    let mut all: Vec<(&str, u32)> = index.doc_freqs().collect();
    all.sort_unstable_by_key(|&(term, df)| (Reverse(df), term));
    take(all, k)
}

/// The `k` terms with the lowest document frequency. Ties are broken by term.
pub fn lowest_doc_freq(index: &InvertedIndex, k: usize) -> Vec<TermFrequency> {
    let mut all: Vec<(&str, u32)> = index.doc_freqs().collect();
    all.sort_unstable_by_key(|&(term, df)| (df, term));
    take(all, k)
}

fn take(sorted: Vec<(&str, u32)>, k: usize) -> Vec<TermFrequency> {
    sorted
        .into_iter()
        .take(k)
        .map(|(term, doc_freq)| TermFrequency { term: term.to_string(), doc_freq })
        .collect()
}
