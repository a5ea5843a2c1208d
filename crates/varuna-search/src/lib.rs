//! Varuna Search — hybrid retrieval over the knowledge graph.
//!
//! Three strategies fused into one ranked result list: exact/keyword
//! lookup, synonym-based term expansion, and bounded graph traversal.

pub mod engine;
pub mod expand;
pub mod traverse;
pub mod types;

pub use engine::HybridSearchEngine;
pub use expand::{tokenize, SemanticExpander, SynonymExpander};
pub use traverse::{traverse, TraversalDirection, TraversalHit, TraversalOptions};
pub use types::{
    EntityGraph, MatchType, Relationship, SearchQuery, SearchResponse, SearchResult, SearchStats,
};
