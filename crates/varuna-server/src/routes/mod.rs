//! HTTP route handlers — the request/response surface the dashboard
//! consumes.

pub mod graph;
pub mod search;
pub mod stats;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Json;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(search::routes())
        .merge(graph::routes())
        .merge(stats::routes())
}

/// Map engine errors to HTTP responses: malformed queries are the
/// caller's fault, everything else is ours.
pub(crate) fn error_response(err: varuna_core::Error) -> (StatusCode, Json<serde_json::Value>) {
    let status = match &err {
        varuna_core::Error::InvalidQuery(_) => StatusCode::BAD_REQUEST,
        varuna_core::Error::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}
