//! Stats and health routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/health", get(get_health))
}

/// GET /api/stats — graph composition and engine tuning, for the
/// dashboard's status panel.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let graph_stats = state.engine.graph().stats();
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds();

    Json(serde_json::json!({
        "graph": graph_stats,
        "engine": state.engine.config(),
        "startedAt": state.started_at.to_rfc3339(),
        "uptimeSeconds": uptime,
    }))
}

/// GET /api/health — liveness probe.
async fn get_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "varuna-knowledge-engine",
        "nodes": state.engine.graph().node_count(),
        "edges": state.engine.graph().edge_count(),
    }))
}
