use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use docsim_core::corpus::{load_corpus, LoadOptions};
use docsim_core::{Index, Tokenizer, TokenizerConfig};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "docsim-indexer")]
#[command(about = "Build a TF-IDF index over a corpus and query it", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print corpus statistics
    Stats {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Number of highest-IDF terms to list
        #[arg(long, default_value_t = 10)]
        top_terms: usize,
    },
    /// Build the index and print the most similar documents for a query
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Query text
        #[arg(long, short)]
        query: String,
        /// Number of results; negative values return nothing
        #[arg(short, default_value_t = 10, allow_negative_numbers = true)]
        k: i64,
        /// Score documents on the rayon thread pool
        #[arg(long, default_value_t = false)]
        parallel: bool,
        /// Truncate document text in the output to this many chars
        #[arg(long, default_value_t = 200)]
        preview_chars: usize,
    },
}

#[derive(Args)]
struct CorpusArgs {
    /// Input path (JSON/JSONL file or directory)
    #[arg(long)]
    input: String,
    /// Drop tokens shorter than this
    #[arg(long, default_value_t = 1)]
    min_token_len: usize,
    /// Drop purely numeric tokens
    #[arg(long, default_value_t = false)]
    drop_numeric: bool,
    /// Remove English stop words
    #[arg(long, default_value_t = false)]
    stopwords: bool,
    /// Apply English stemming
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Strip newsgroup headers, signatures and quoted text
    #[arg(long, default_value_t = false)]
    newsgroups: bool,
    #[arg(long, default_value_t = false)]
    strip_headers: bool,
    #[arg(long, default_value_t = false)]
    strip_footers: bool,
    #[arg(long, default_value_t = false)]
    strip_quotes: bool,
}

impl CorpusArgs {
    fn load_options(&self) -> LoadOptions {
        if self.newsgroups {
            return LoadOptions::newsgroups();
        }
        LoadOptions { strip_headers: self.strip_headers, strip_footers: self.strip_footers, strip_quotes: self.strip_quotes }
    }

    fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(TokenizerConfig {
            min_token_len: self.min_token_len,
            drop_numeric: self.drop_numeric,
            stopwords: self.stopwords,
            stem: self.stem,
        })
    }

    fn build(&self) -> Result<Index> {
        let docs = load_corpus(&self.input, &self.load_options())?;
        Ok(Index::build(docs, self.tokenizer())?)
    }
}

#[derive(Serialize)]
struct Stats<'a> {
    num_docs: usize,
    num_terms: usize,
    empty_docs: usize,
    labels: Vec<(&'a str, usize)>,
    top_idf_terms: Vec<(&'a str, f32)>,
}

#[derive(Serialize)]
struct Hit<'a> {
    rank: usize,
    doc_id: u32,
    label: &'a str,
    score: f32,
    text: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { corpus, top_terms } => {
            let index = corpus.build()?;
            print_stats(&index, top_terms)
        }
        Commands::Search { corpus, query, k, parallel, preview_chars } => {
            let index = corpus.build()?;
            run_search(&index, &query, k, parallel, preview_chars)
        }
    }
}

fn print_stats(index: &Index, top_terms: usize) -> Result<()> {
    let mut labels: Vec<(&str, usize)> = Vec::new();
    for doc in index.documents() {
        match labels.iter_mut().find(|(l, _)| *l == doc.label) {
            Some((_, count)) => *count += 1,
            None => labels.push((doc.label.as_str(), 1)),
        }
    }
    let mut terms: Vec<(&str, f32)> = index.vocabulary().iter().map(|(tid, t)| (t, index.store().idf(tid))).collect();
    terms.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    terms.truncate(top_terms);

    let stats = Stats {
        num_docs: index.len(),
        num_terms: index.vocabulary().len(),
        empty_docs: index.store().iter().filter(|(_, v)| v.is_empty()).count(),
        labels,
        top_idf_terms: terms,
    };
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn run_search(index: &Index, query: &str, k: i64, parallel: bool, preview_chars: usize) -> Result<()> {
    let n = usize::try_from(k).unwrap_or(0);
    let hits = if parallel { index.search_parallel(query, n) } else { index.search(query, n) };
    tracing::info!(query, k, hits = hits.len(), "query complete");
    let out: Vec<Hit> = hits
        .iter()
        .enumerate()
        .map(|(i, h)| Hit { rank: i + 1, doc_id: h.doc_id, label: h.label, score: h.score, text: h.text.chars().take(preview_chars).collect() })
        .collect();
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
