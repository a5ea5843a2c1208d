//! Search and context routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::routes::error_response;
use crate::state::AppState;
use varuna_search::SearchQuery;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", post(search))
        .route("/supplies/{name}", get(find_supply))
        .route("/context", post(generate_context))
}

/// POST /api/search — hybrid search over the knowledge graph.
async fn search(
    State(state): State<Arc<AppState>>,
    Json(query): Json<SearchQuery>,
) -> impl IntoResponse {
    match state.engine.search(&query) {
        Ok(response) => Json(response).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}

/// GET /api/supplies/{name} — exact-resource lookup. A hit with
/// score 1.0 is verified ground truth; anything else is a tagged
/// best-effort fallback.
async fn find_supply(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    match state.engine.find_exact_supply(&name) {
        Some(result) => {
            let verified = result.score >= 1.0;
            Json(serde_json::json!({
                "result": result,
                "verified": verified,
            }))
            .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("no supply matching \"{name}\"") })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContextRequest {
    query: String,
    #[serde(default = "default_max_tokens")]
    max_tokens: usize,
}

fn default_max_tokens() -> usize {
    1000
}

/// POST /api/context — token-budgeted grounding context for the text
/// generator.
async fn generate_context(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContextRequest>,
) -> impl IntoResponse {
    match state
        .context_builder
        .generate_context(&state.engine, &request.query, request.max_tokens)
    {
        Ok(context) => Json(context).into_response(),
        Err(err) => error_response(err).into_response(),
    }
}
