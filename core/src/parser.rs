//! Splits raw collection text into documents.
//!
//! A collection file is a sequence of `<DOC>`-delimited segments, each carrying a
//! `<DOCNO>` identifier and any number of `<TEXT>` bodies:
//!
//! ```text
//! <DOC>
//! <DOCNO> AP880212-0001 </DOCNO>
//! <TEXT>first body</TEXT>
//! <TEXT>second body</TEXT>
//! </DOC>
//! ```

use crate::tokenizer::tokenize;
use lazy_static::lazy_static;
use regex::Regex;

pub const DOC_MARKER: &str = "<DOC>";

lazy_static! {
    static ref DOCNO: Regex = Regex::new(r"(?s)<DOCNO>(.*?)</DOCNO>").expect("valid regex");
    static ref TEXT: Regex = Regex::new(r"(?s)<TEXT>(.*?)</TEXT>").expect("valid regex");
}

/// One document segment, borrowed from the collection text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    pub external_id: &'a str,
    pub text_fields: Vec<&'a str>,
}

impl<'a> Document<'a> {
    /// Terms of all text fields in order, as if the fields were joined by a single space.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.text_fields.iter().copied().flat_map(|field| tokenize(field))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDoc<'a> {
    Parsed(Document<'a>),
    /// The segment had no `<DOCNO>`. `ordinal` is its 1-based position among the
    /// non-blank segments of the file.
    MissingId { ordinal: usize },
}

/// Lazy iterator over the documents of one collection file.
pub struct Documents<'a> {
    segments: std::str::Split<'a, &'static str>,
    ordinal: usize,
}

impl<'a> Iterator for Documents<'a> {
    type Item = ParsedDoc<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let segment = self.segments.next()?;
            if segment.trim().is_empty() {
                continue;
            }
            self.ordinal += 1;
            return Some(parse_segment(segment, self.ordinal));
        }
    }
}

/// Parse a collection file. Anything before the first `<DOC>` is discarded.
pub fn parse_collection(content: &str) -> Documents<'_> {
    let mut segments = content.split(DOC_MARKER);
    segments.next();
    Documents { segments, ordinal: 0 }
}

fn parse_segment(segment: &str, ordinal: usize) -> ParsedDoc<'_> {
    let Some(docno) = DOCNO.captures(segment).and_then(|c| c.get(1)) else {
        return ParsedDoc::MissingId { ordinal };
    };
    let text_fields = TEXT
        .captures_iter(segment)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .collect();
    ParsedDoc::Parsed(Document { external_id: docno.as_str().trim(), text_fields })
}
