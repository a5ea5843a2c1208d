//! Knowledge graph inspection routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/graph", get(get_graph))
        .route("/graph/nodes/{id}", get(get_node))
}

/// GET /api/graph — full node and edge listing for the dashboard's
/// knowledge panel.
async fn get_graph(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let graph = state.engine.graph();
    let nodes: Vec<_> = graph.nodes().collect();
    Json(serde_json::json!({
        "nodes": nodes,
        "edges": graph.edges(),
    }))
}

/// GET /api/graph/nodes/{id} — one node with its direct relationships.
async fn get_node(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let graph = state.engine.graph();
    match graph.get(&id) {
        Some(node) => {
            let outgoing: Vec<_> = graph
                .edges_from(&id)
                .into_iter()
                .map(|(edge, related)| {
                    serde_json::json!({ "edge": edge, "relatedNode": related })
                })
                .collect();
            let incoming: Vec<_> = graph
                .edges_to(&id)
                .into_iter()
                .map(|(edge, related)| {
                    serde_json::json!({ "edge": edge, "relatedNode": related })
                })
                .collect();
            Json(serde_json::json!({
                "node": node,
                "outgoing": outgoing,
                "incoming": incoming,
            }))
            .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("no node with id \"{id}\"") })),
        )
            .into_response(),
    }
}
