use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use retrieval_core::query::{format_result, parse_query_file};
use retrieval_core::stats::{highest_doc_freq, lowest_doc_freq};
use retrieval_core::{build_index, BooleanRetriever, BuildConfig, BuildStats, InvertedIndex, MissingIdPolicy};
use tracing_subscriber::{fmt, EnvFilter};

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build an in-memory inverted index and answer boolean RPN queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OnMissingId {
    /// Leave documents without a DOCNO out of the index
    Skip,
    /// Abort the build
    Fail,
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Collection path (file or directory)
    #[arg(long)]
    data: PathBuf,
    /// What to do with documents that have no DOCNO field
    #[arg(long, value_enum, default_value_t = OnMissingId::Skip)]
    on_missing_id: OnMissingId,
    /// Tokenize files on a single thread
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

impl BuildArgs {
    fn config(&self) -> BuildConfig {
        let missing_id = match self.on_missing_id {
            OnMissingId::Skip => MissingIdPolicy::Skip,
            OnMissingId::Fail => MissingIdPolicy::Fail,
        };
        BuildConfig { missing_id, parallel: !self.sequential }
    }

    fn build(&self) -> Result<(InvertedIndex, BuildStats)> {
        build_index(&self.data, &self.config())
            .with_context(|| format!("building index from {}", self.data.display()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a file of RPN queries, writing one line of document ids per query
    Query {
        #[command(flatten)]
        build: BuildArgs,
        /// Query file, one RPN query per line
        #[arg(long)]
        queries: PathBuf,
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print collection statistics and the extreme document-frequency terms
    Stats {
        #[command(flatten)]
        build: BuildArgs,
        /// How many terms to list at each end
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Query { build, queries, output } => run_queries(&build, &queries, output.as_deref()),
        Commands::Stats { build, top } => print_stats(&build, top),
    }
}

fn run_queries(build: &BuildArgs, queries_path: &Path, output: Option<&Path>) -> Result<()> {
    // Read queries first so a missing query file fails before the (slow) build.
    let content = fs::read_to_string(queries_path)
        .with_context(|| format!("reading query file {}", queries_path.display()))?;
    let queries = parse_query_file(&content);

    let (index, _) = build.build()?;
    let retriever = BooleanRetriever::new(&index);

    let mut out: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating output file {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let mut failed = 0usize;
    for (n, query) in queries.iter().enumerate() {
        tracing::debug!(query = query.text, "executing query {}/{}", n + 1, queries.len());
        let line = match retriever.retrieve(query.text) {
            Ok(ids) => format_result(&ids),
            Err(err) => {
                tracing::warn!(line = query.line, query = query.text, %err, "malformed query");
                failed += 1;
                String::new()
            }
        };
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    tracing::info!(queries = queries.len(), failed, "boolean retrieval complete");
    if failed > 0 {
        bail!("{failed} of {} queries in {} were malformed", queries.len(), queries_path.display());
    }
    Ok(())
}

fn print_stats(build: &BuildArgs, top: usize) -> Result<()> {
    let (index, stats) = build.build()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "files: {}", stats.files)?;
    writeln!(out, "documents: {}", stats.documents)?;
    writeln!(out, "skipped: {}", stats.skipped)?;
    writeln!(out, "vocabulary: {}", stats.terms)?;

    writeln!(out, "\nhighest document frequency:")?;
    for t in highest_doc_freq(&index, top) {
        writeln!(out, "  {}: {}", t.term, t.doc_freq)?;
    }
    writeln!(out, "\nlowest document frequency:")?;
    for t in lowest_doc_freq(&index, top) {
        writeln!(out, "  {}: {}", t.term, t.doc_freq)?;
    }
    Ok(())
}
