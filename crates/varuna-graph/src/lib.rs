//! Varuna Graph — emergency-medicine knowledge graph.
//!
//! A fixed, deterministic in-memory graph of protocols, supplies, staff
//! roles, conditions, and equipment, built once at startup from curated
//! domain data and shared read-only for the life of the process.

pub mod builder;
pub mod graph;
pub mod index;
pub mod schema;

pub use builder::build_knowledge_graph;
pub use graph::{GraphStats, KnowledgeGraph};
pub use index::KeywordIndex;
pub use schema::{node_id, GraphEdge, GraphNode, NodeType, RelationType};
