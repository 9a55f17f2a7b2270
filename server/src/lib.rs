use axum::{extract::{Path, Query, State}, routing::get, Form, Json, Router};
use docsim_core::corpus::LoadOptions;
use docsim_core::{Index, Tokenizer, TokenizerConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod errors;
pub mod snippet;

use errors::ApiError;

/// Corpus location plus the loader and tokenizer policy applied to it.
#[derive(Debug, Clone, clap::Args)]
pub struct CorpusArgs {
    /// Corpus path (JSON/JSONL file or directory)
    #[arg(long)]
    pub corpus: String,
    #[arg(long, default_value_t = 1)]
    pub min_token_len: usize,
    #[arg(long, default_value_t = false)]
    pub drop_numeric: bool,
    #[arg(long, default_value_t = false)]
    pub stopwords: bool,
    #[arg(long, default_value_t = false)]
    pub stem: bool,
    /// Strip newsgroup headers, signatures and quoted text
    #[arg(long, default_value_t = false)]
    pub newsgroups: bool,
    #[arg(long, default_value_t = false)]
    pub strip_headers: bool,
    #[arg(long, default_value_t = false)]
    pub strip_footers: bool,
    #[arg(long, default_value_t = false)]
    pub strip_quotes: bool,
}

impl CorpusArgs {
    pub fn load_options(&self) -> LoadOptions {
        if self.newsgroups {
            return LoadOptions::newsgroups();
        }
        LoadOptions { strip_headers: self.strip_headers, strip_footers: self.strip_footers, strip_quotes: self.strip_quotes }
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(TokenizerConfig {
            min_token_len: self.min_token_len,
            drop_numeric: self.drop_numeric,
            stopwords: self.stopwords,
            stem: self.stem,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Result count when the request does not give one.
    pub default_k: usize,
    /// Upper bound on the result count.
    pub max_k: usize,
    /// Longer queries are rejected with 400.
    pub max_query_chars: usize,
    /// Comma-separated allowed origins; any origin when unset.
    pub cors_allow_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { default_k: 10, max_k: 100, max_query_chars: 4096, cors_allow_origin: None }
    }
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub k: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchForm {
    pub query: String,
    pub k: Option<i64>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: u32,
    pub label: String,
    pub score: f32,
    pub snippet: Option<String>,
    pub text: String,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc_id: u32,
    pub label: String,
    pub text: String,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<Index>,
    pub config: Arc<ServerConfig>,
}

/// Router over an already built index. The index is shared read-only by all
/// requests.
pub fn build_app(index: Arc<Index>, config: ServerConfig) -> Router {
    let cors = match &config.cors_allow_origin {
        Some(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        None => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let state = AppState { index, config: Arc::new(config) };
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler).post(search_form_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    search_blocking(state, params.q, params.k).await.map(Json)
}

pub async fn search_form_handler(State(state): State<AppState>, Form(form): Form<SearchForm>) -> Result<Json<SearchResponse>, ApiError> {
    search_blocking(state, form.query, form.k).await.map(Json)
}

// The scan touches every document, so keep it off the async workers.
async fn search_blocking(state: AppState, query: String, k: Option<i64>) -> Result<SearchResponse, ApiError> {
    tokio::task::spawn_blocking(move || run_search(&state, query, k))
        .await
        .map_err(|e| ApiError::Internal(format!("search task failed: {e}")))?
}

fn run_search(state: &AppState, query: String, k: Option<i64>) -> Result<SearchResponse, ApiError> {
    if query.chars().count() > state.config.max_query_chars {
        return Err(ApiError::BadRequest(format!("query longer than {} chars", state.config.max_query_chars)));
    }
    let start = std::time::Instant::now();
    // Negative counts are an empty result, not an error.
    let k = match k {
        Some(k) => usize::try_from(k).unwrap_or(0),
        None => state.config.default_k,
    }
    .min(state.config.max_k);

    let words = snippet::query_words(&query);
    let results: Vec<SearchHit> = state
        .index
        .search(&query, k)
        .into_iter()
        .map(|h| SearchHit {
            doc_id: h.doc_id,
            label: h.label.to_string(),
            score: h.score,
            snippet: snippet::snippet(h.text, &words),
            text: h.text.to_string(),
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::info!(k, hits = results.len(), took_s = elapsed.as_secs_f64(), "search");
    Ok(SearchResponse { query, took_s: elapsed.as_secs_f64(), results })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<u32>) -> Result<Json<DocResponse>, ApiError> {
    match state.index.document(doc_id) {
        Some(doc) => Ok(Json(DocResponse { doc_id, label: doc.label.clone(), text: doc.text.clone() })),
        None => Err(ApiError::NotFound(format!("document {doc_id} not found"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        corpus: CorpusArgs,
    }

    #[test]
    fn strip_flags_apply_individually() {
        let w = Wrapper::parse_from(["server", "--corpus", "c.jsonl", "--strip-quotes"]);
        assert_eq!(w.corpus.load_options(), LoadOptions { strip_headers: false, strip_footers: false, strip_quotes: true });

        let w = Wrapper::parse_from(["server", "--corpus", "c.jsonl", "--strip-headers", "--strip-footers"]);
        assert_eq!(w.corpus.load_options(), LoadOptions { strip_headers: true, strip_footers: true, strip_quotes: false });
    }

    #[test]
    fn newsgroups_enables_all_cleanup() {
        let w = Wrapper::parse_from(["server", "--corpus", "dir", "--newsgroups"]);
        assert_eq!(w.corpus.load_options(), LoadOptions::newsgroups());
    }

    #[test]
    fn tokenizer_flags_reach_the_config() {
        let w = Wrapper::parse_from(["server", "--corpus", "dir", "--stem", "--min-token-len", "3"]);
        let tok = w.corpus.tokenizer();
        assert!(tok.config().stem);
        assert_eq!(tok.config().min_token_len, 3);
        assert!(!tok.config().stopwords);
    }
}
