//! Stack evaluation of boolean queries written in Reverse Polish Notation.
//!
//! `cat dog AND mouse OR` reads as `(cat AND dog) OR mouse`. `NOT` is binary:
//! `a b NOT` is every document with `a` that lacks `b`.

use crate::error::QueryError;
use crate::index::{DocId, InvertedIndex};
use crate::postings::{and_not, intersect, union};
use crate::tokenizer::query_tokens;
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
    Not,
}

impl Operator {
    /// Resolve a query token, ignoring ASCII case. Anything else is a term.
    pub fn parse(token: &str) -> Option<Self> {
        if token.eq_ignore_ascii_case("AND") {
            Some(Operator::And)
        } else if token.eq_ignore_ascii_case("OR") {
            Some(Operator::Or)
        } else if token.eq_ignore_ascii_case("NOT") {
            Some(Operator::Not)
        } else {
            None
        }
    }

    /// Combine `p1` (pushed first) with `p2` (top of stack).
    pub fn apply(self, p1: &[DocId], p2: &[DocId]) -> Vec<DocId> {
        match self {
            // shorter list drives the scan
            Operator::And if p1.len() <= p2.len() => intersect(p1, p2),
            Operator::And => intersect(p2, p1),
            Operator::Or => union(p1, p2),
            Operator::Not => and_not(p1, p2),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'q> {
    Term(&'q str),
    Op(Operator),
}

impl<'q> Token<'q> {
    pub fn classify(raw: &'q str) -> Self {
        Operator::parse(raw).map_or(Token::Term(raw), Token::Op)
    }
}

/// Answers RPN queries against a finished index. Holds no per-query state, so one
/// retriever can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct BooleanRetriever<'a> {
    index: &'a InvertedIndex,
}

impl<'a> BooleanRetriever<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index }
    }

    /// Evaluate `query` to internal ids in ascending order. An empty query
    /// matches nothing.
    pub fn evaluate(&self, query: &str) -> Result<Vec<DocId>, QueryError> {
        // Term postings are borrowed from the index; only operator results are owned.
        let mut stack: Vec<Cow<'a, [DocId]>> = Vec::new();
        for (position, raw) in query_tokens(query).enumerate() {
            match Token::classify(raw) {
                Token::Term(term) => stack.push(Cow::Borrowed(self.index.postings(term))),
                Token::Op(op) => {
                    let available = stack.len();
                    let (Some(p2), Some(p1)) = (stack.pop(), stack.pop()) else {
                        return Err(QueryError::MissingOperand { op, position: position + 1, available });
                    };
                    stack.push(Cow::Owned(op.apply(&p1, &p2)));
                }
            }
        }
        match stack.len() {
            0 => Ok(Vec::new()),
            1 => Ok(stack.pop().map(Cow::into_owned).unwrap_or_default()),
            remaining => Err(QueryError::LeftoverOperands { remaining }),
        }
    }

    /// Evaluate `query` and map the result to external document ids.
    pub fn retrieve(&self, query: &str) -> Result<Vec<&'a str>, QueryError> {
        let ids = self.evaluate(query)?;
        Ok(ids.into_iter().filter_map(|id| self.index.external_id(id)).collect())
    }
}

/// A query read from a query file, tagged with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryLine<'q> {
    pub line: usize,
    pub text: &'q str,
}

/// Queries of a query file, one per line. Blank lines are skipped.
pub fn parse_query_file(content: &str) -> Vec<QueryLine<'_>> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| QueryLine { line: i + 1, text: l.trim() })
        .filter(|q| !q.text.is_empty())
        .collect()
}

/// One output line: external ids separated by single spaces.
pub fn format_result(external_ids: &[&str]) -> String {
    external_ids.join(" ")
}
