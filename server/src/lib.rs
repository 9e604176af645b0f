use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use retrieval_core::stats::{highest_doc_freq, lowest_doc_freq, TermFrequency};
use retrieval_core::{build_index, BooleanRetriever, BuildConfig, BuildStats, DocId, InvertedIndex};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    /// RPN query, e.g. `cat dog AND`
    pub q: String,
    /// Optional cap on returned hits; `total_hits` always counts every match.
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub external_id: String,
}

#[derive(Deserialize)]
pub struct StatsParams {
    #[serde(default = "default_top")]
    pub top: usize,
}
fn default_top() -> usize { 10 }

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub build: BuildStats,
    pub highest_doc_freq: Vec<TermFrequency>,
    pub lowest_doc_freq: Vec<TermFrequency>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: msg.into() }))
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<InvertedIndex>,
    pub stats: BuildStats,
}

/// Build the index from `data` and wrap it in the HTTP router.
pub fn build_app(data: PathBuf, config: &BuildConfig) -> Result<Router> {
    let (index, stats) =
        build_index(&data, config).with_context(|| format!("building index from {}", data.display()))?;
    Ok(router(AppState { index: Arc::new(index), stats }))
}

pub fn router(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
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
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/stats", get(stats_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let retriever = BooleanRetriever::new(&state.index);
    let ids = retriever.evaluate(&params.q).map_err(|err| {
        tracing::warn!(query = %params.q, %err, "malformed query");
        api_error(StatusCode::BAD_REQUEST, err.to_string())
    })?;

    let total_hits = ids.len();
    let k = params.k.unwrap_or(total_hits);
    let results = ids
        .into_iter()
        .take(k)
        .filter_map(|doc_id| {
            state.index.external_id(doc_id).map(|ext| SearchHit { doc_id, external_id: ext.to_string() })
        })
        .collect();

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results }))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    match state.index.external_id(doc_id) {
        Some(external_id) => Ok(Json(serde_json::json!({
            "doc_id": doc_id,
            "external_id": external_id,
        }))),
        None => Err(api_error(StatusCode::NOT_FOUND, "not found")),
    }
}

pub async fn stats_handler(State(state): State<AppState>, Query(params): Query<StatsParams>) -> Json<StatsResponse> {
    Json(StatsResponse {
        build: state.stats,
        highest_doc_freq: highest_doc_freq(&state.index, params.top),
        lowest_doc_freq: lowest_doc_freq(&state.index, params.top),
    })
}
