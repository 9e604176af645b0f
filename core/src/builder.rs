use crate::config::{BuildConfig, MissingIdPolicy};
use crate::error::BuildError;
use crate::index::{DocId, InvertedIndex};
use crate::parser::{parse_collection, ParsedDoc};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Counters describing a finished build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub files: usize,
    pub documents: u32,
    /// Documents dropped for lacking a `<DOCNO>` field.
    pub skipped: usize,
    pub terms: usize,
}

/// Accumulates postings, document frequencies and the identifier map.
///
/// Ids are handed out in the order documents are added, so every posting list is
/// appended in ascending order and never needs sorting.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    postings: HashMap<String, Vec<DocId>>,
    external_ids: Vec<String>,
    skipped: usize,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one document and return its internal id. Repeated terms count once.
    pub fn add_document<'t, I>(&mut self, external_id: &str, tokens: I) -> DocId
    where
        I: IntoIterator<Item = &'t str>,
    {
        let doc_id = self.external_ids.len() as DocId;
        self.external_ids.push(external_id.to_string());

        let distinct: HashSet<&str> = tokens.into_iter().collect();
        for term in distinct {
            match self.postings.get_mut(term) {
                Some(list) => list.push(doc_id),
                None => {
                    self.postings.insert(term.to_string(), vec![doc_id]);
                }
            }
        }
        doc_id
    }

    /// Record a document that was left out of the index.
    pub fn skip_document(&mut self) {
        self.skipped += 1;
    }

    pub fn num_docs(&self) -> u32 {
        self.external_ids.len() as u32
    }

    /// Append a builder that was filled independently (e.g. one file on another
    /// thread). Its local ids are shifted past every document already held here.
    pub fn absorb(&mut self, other: IndexBuilder) {
        let offset = self.num_docs();
        for (term, ids) in other.postings {
            let list = self.postings.entry(term).or_default();
            list.extend(ids.into_iter().map(|id| id + offset));
        }
        self.external_ids.extend(other.external_ids);
        self.skipped += other.skipped;
    }

    pub fn finish(self) -> (InvertedIndex, BuildStats) {
        let stats = BuildStats {
            files: 0,
            documents: self.external_ids.len() as u32,
            skipped: self.skipped,
            terms: self.postings.len(),
        };
        let index = InvertedIndex {
            postings: self.postings,
            external_ids: self.external_ids,
        };
        (index, stats)
    }
}

/// Index one collection file's contents into a fresh builder with local ids.
pub fn index_contents(content: &str, path: &Path, policy: MissingIdPolicy) -> Result<IndexBuilder, BuildError> {
    let mut builder = IndexBuilder::new();
    for doc in parse_collection(content) {
        match doc {
            ParsedDoc::Parsed(doc) => {
                builder.add_document(doc.external_id, doc.tokens());
            }
            ParsedDoc::MissingId { ordinal } => match policy {
                MissingIdPolicy::Skip => {
                    tracing::debug!(path = %path.display(), ordinal, "skipping document without DOCNO");
                    builder.skip_document();
                }
                MissingIdPolicy::Fail => {
                    return Err(BuildError::MissingDocId { path: path.to_path_buf(), ordinal });
                }
            },
        }
    }
    Ok(builder)
}

/// Decode UTF-8, silently dropping invalid byte sequences so `caf\xff` reads as `caf`.
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

fn index_file(path: &Path, policy: MissingIdPolicy) -> Result<IndexBuilder, BuildError> {
    let bytes = std::fs::read(path).map_err(|source| BuildError::Io { path: path.to_path_buf(), source })?;
    let content = decode_dropping_invalid(&bytes);
    let builder = index_contents(&content, path, policy)?;
    tracing::debug!(path = %path.display(), docs = builder.num_docs(), "indexed file");
    Ok(builder)
}

/// Collection files under `input`. Within each directory, files come first in name
/// order, then each sub-directory is walked in name order. A plain file is its own
/// collection.
pub fn collection_files(input: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if !input.exists() {
        return Err(BuildError::NotFound(input.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by(|a, b| {
        let (a_dir, b_dir) = (a.file_type().is_dir(), b.file_type().is_dir());
        a_dir.cmp(&b_dir).then_with(|| a.file_name().cmp(b.file_name()))
    }) {
        let entry = entry.map_err(|source| BuildError::Walk { path: input.to_path_buf(), source })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Build the index for every collection file under `input`.
///
/// Files are tokenized independently (on the rayon pool when `config.parallel`)
/// and merged in walk order, so the result does not depend on scheduling. Any
/// read failure aborts the whole build.
pub fn build_index(input: &Path, config: &BuildConfig) -> Result<(InvertedIndex, BuildStats), BuildError> {
    let start = Instant::now();
    let files = collection_files(input)?;
    let policy = config.missing_id;

    let partials: Vec<IndexBuilder> = if config.parallel {
        // Collect every outcome so the reported failure is the first in file order.
        let outcomes: Vec<Result<IndexBuilder, BuildError>> =
            files.par_iter().map(|path| index_file(path, policy)).collect();
        outcomes.into_iter().collect::<Result<Vec<_>, BuildError>>()?
    } else {
        files.iter().map(|path| index_file(path, policy)).collect::<Result<Vec<_>, BuildError>>()?
    };

    let mut builder = IndexBuilder::new();
    for partial in partials {
        builder.absorb(partial);
    }
    let (index, mut stats) = builder.finish();
    stats.files = files.len();

    tracing::info!(
        files = stats.files,
        num_docs = stats.documents,
        num_terms = stats.terms,
        skipped = stats.skipped,
        elapsed_s = start.elapsed().as_secs_f64(),
        "index construction complete"
    );
    Ok((index, stats))
}
