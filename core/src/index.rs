use std::collections::HashMap;

/// Dense internal document id, assigned in discovery order starting at 0.
pub type DocId = u32;

/// Term-level inverted index over a document collection.
///
/// Built once by [`crate::IndexBuilder`] and read-only afterwards, so a shared
/// reference can serve any number of concurrent queries.
#[derive(Debug, Default, Clone)]
pub struct InvertedIndex {
    pub(crate) postings: HashMap<String, Vec<DocId>>, // ascending, no duplicates
    pub(crate) external_ids: Vec<String>, // indexed by DocId
}

impl InvertedIndex {
    /// Posting list for `term`. An unknown term yields an empty list.
    pub fn postings(&self, term: &str) -> &[DocId] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of documents containing `term` at least once. Each document appears
    /// once per posting list, so this is the list's length.
    pub fn doc_freq(&self, term: &str) -> u32 {
        self.postings(term).len() as u32
    }

    pub fn doc_freqs(&self) -> impl Iterator<Item = (&str, u32)> {
        self.postings.iter().map(|(t, ids)| (t.as_str(), ids.len() as u32))
    }

    pub fn external_id(&self, doc_id: DocId) -> Option<&str> {
        self.external_ids.get(doc_id as usize).map(String::as_str)
    }

    /// Identifier map, indexed by internal id.
    pub fn external_ids(&self) -> &[String] {
        &self.external_ids
    }

    pub fn num_docs(&self) -> u32 {
        self.external_ids.len() as u32
    }

    pub fn vocabulary_len(&self) -> usize {
        self.postings.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.postings.keys().map(String::as_str)
    }
}
