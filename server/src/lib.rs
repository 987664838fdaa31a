use anyhow::{Context, Result};
use axum::{extract::{Query, State}, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use wikisearch_core::{Engine, SearchResult};

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Kept as text so junk like `limit=abc` falls back to the default.
    #[serde(default)]
    pub limit: Option<String>,
}

impl SearchParams {
    fn limit(&self) -> usize {
        match self.limit.as_deref().map(str::trim).and_then(|l| l.parse::<i64>().ok()) {
            Some(l) if l > 0 => usize::try_from(l).unwrap_or(usize::MAX),
            _ => DEFAULT_LIMIT,
        }
    }
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub total_hits: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

pub fn build_app(index_dir: String) -> Result<Router> {
    let engine = Engine::load(&index_dir).with_context(|| format!("loading index from {index_dir}"))?;
    let stats = engine.stats();
    tracing::info!(documents = stats.doc_count, avg_doc_len = stats.avg_doc_len, "search engine loaded");
    Ok(router(Arc::new(engine)))
}

pub fn router(engine: Arc<Engine>) -> Router {
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
        .route("/api/search", get(api_search_handler))
        .with_state(AppState { engine })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let query = params.q.trim().to_string();
    if query.is_empty() {
        return Ok(Json(SearchResponse { query, took_ms: 0, total_hits: 0, results: vec![] }));
    }
    let page = state.engine.search_page(&query, params.limit()).map_err(internal)?;
    Ok(Json(SearchResponse {
        query,
        took_ms: start.elapsed().as_millis(),
        total_hits: page.total_hits,
        results: page.results,
    }))
}

pub async fn api_search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, (StatusCode, String)> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Query parameter 'q' is required".into()));
    }
    let results = state.engine.search(query, params.limit()).map_err(internal)?;
    Ok(Json(results))
}

fn internal(err: wikisearch_core::Error) -> (StatusCode, String) {
    tracing::error!(error = %err, "search failed");
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Search error: {err}"))
}
