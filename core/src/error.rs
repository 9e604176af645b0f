use crate::query::Operator;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort index construction. A partial index is never returned.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("collection path {0} does not exist")]
    NotFound(PathBuf),

    #[error("failed to read collection file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk collection directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Only raised under [`crate::MissingIdPolicy::Fail`].
    #[error("document #{ordinal} in {path} has no <DOCNO> field")]
    MissingDocId { path: PathBuf, ordinal: usize },
}

/// A malformed RPN query. Absent terms are not errors; they evaluate to an empty list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("operator {op} at token {position} needs two operands, found {available}")]
    MissingOperand { op: Operator, position: usize, available: usize },

    #[error("query left {remaining} operands on the stack, expected exactly one")]
    LeftoverOperands { remaining: usize },
}
