//! Shared application state.

use std::sync::Arc;

use varuna_core::{Result, ServerConfig};
use varuna_graph::build_knowledge_graph;
use varuna_rag::ContextBuilder;
use varuna_search::HybridSearchEngine;

/// Shared state accessible from all route handlers. The engine and its
/// graph are built once and never mutated, so no locking is needed.
pub struct AppState {
    pub config: ServerConfig,
    pub engine: HybridSearchEngine,
    pub context_builder: ContextBuilder,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Build the knowledge graph and the engine on top of it.
    pub fn initialize(config: ServerConfig) -> Result<Self> {
        config.engine.scoring.validate()?;
        let graph = Arc::new(build_knowledge_graph()?);
        let engine = HybridSearchEngine::new(graph, config.engine.clone());
        Ok(Self {
            config,
            engine,
            context_builder: ContextBuilder::new(),
            started_at: chrono::Utc::now(),
        })
    }
}
