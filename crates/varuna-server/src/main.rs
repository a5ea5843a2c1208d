//! Varuna — hospital-operations knowledge engine server.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = varuna_core::ServerConfig::from_env();
    let port = config.port;

    // The graph is built exactly once; a construction error (e.g. a
    // relationship table naming an undeclared node) must prevent the
    // service from serving traffic at all.
    let state = Arc::new(AppState::initialize(config)?);
    info!(
        nodes = state.engine.graph().node_count(),
        edges = state.engine.graph().edge_count(),
        "knowledge engine ready"
    );

    let app = routes::build_router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("listening on http://0.0.0.0:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}
