/// Split text into terms on whitespace.
///
/// Terms are returned exactly as they appear: no case folding, no punctuation
/// stripping and no stemming, so `Cat`, `cat` and `cat,` are three different terms.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Split an RPN query line into tokens. Query tokens are separated by ASCII whitespace only.
pub fn query_tokens(query: &str) -> impl Iterator<Item = &str> {
    query.split_ascii_whitespace()
}
