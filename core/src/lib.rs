//! Boolean retrieval over a tagged document collection.
//!
//! The pipeline runs one way: raw collection text is split into documents by
//! [`parser`], each document's terms are accumulated by [`builder`] into an
//! immutable [`InvertedIndex`], and RPN queries are answered by [`query`] on top
//! of the merge operations in [`postings`].

pub mod builder;
pub mod config;
pub mod error;
pub mod index;
pub mod parser;
pub mod postings;
pub mod query;
pub mod stats;
pub mod tokenizer;

pub use builder::{build_index, BuildStats, IndexBuilder};
pub use config::{BuildConfig, MissingIdPolicy};
pub use error::{BuildError, QueryError};
pub use index::{DocId, InvertedIndex};
pub use query::{BooleanRetriever, Operator};
