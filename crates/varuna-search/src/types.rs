//! Query and result types for hybrid search.

use serde::{Deserialize, Serialize};
use varuna_core::{Error, Result};
use varuna_graph::{GraphEdge, GraphNode, NodeType};

/// A hybrid search request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub text: String,
    /// Terms that must resolve by exact name only — bypass all fuzzy
    /// matching. Unknown terms contribute nothing (not an error).
    #[serde(default)]
    pub exact_match_terms: Vec<String>,
    /// Restrict keyword/semantic matching to these node types.
    #[serde(default)]
    pub node_types: Option<Vec<NodeType>>,
    /// Traversal hop bound; engine default applies when absent.
    #[serde(default)]
    pub max_hops: Option<usize>,
    /// Drop results scoring below this threshold.
    #[serde(default)]
    pub min_relevance: Option<f64>,
    /// Maximum number of results to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exact_match_terms: Vec::new(),
            node_types: None,
            max_hops: None,
            min_relevance: None,
            limit: None,
        }
    }

    /// Reject malformed queries before execution. Silent clamping would
    /// hide caller mistakes, so out-of-range values are errors.
    pub fn validate(&self, max_hops_cap: usize) -> Result<()> {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return Err(Error::InvalidQuery("limit must be at least 1".into()));
            }
        }
        if let Some(min) = self.min_relevance {
            if !(0.0..=1.0).contains(&min) {
                return Err(Error::InvalidQuery(format!(
                    "minRelevance must be in [0, 1], got {min}"
                )));
            }
        }
        if let Some(hops) = self.max_hops {
            if hops > max_hops_cap {
                return Err(Error::InvalidQuery(format!(
                    "maxHops must be at most {max_hops_cap}, got {hops}"
                )));
            }
        }
        Ok(())
    }
}

/// How a result was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Caller-supplied exact term or verified exact-name lookup.
    Exact,
    /// Synonym-expansion overlap.
    Semantic,
    /// Discovered only by graph traversal.
    Graph,
    /// Keyword/semantic hit that traversal also reached.
    Hybrid,
}

/// An edge paired with the node at its far end, for explainability.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub edge: GraphEdge,
    pub related_node: GraphNode,
}

/// One ranked search result.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub node: GraphNode,
    pub score: f64,
    pub match_type: MatchType,
    pub explanation: String,
    /// Node path from a traversal seed to this node, when discovered or
    /// confirmed by traversal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph_path: Option<Vec<GraphNode>>,
    /// Direct relationships of the node, populated for traversal finds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<Vec<Relationship>>,
}

/// The sub-graph induced by a result set: the result nodes plus every
/// original edge whose endpoints both made the cut. No synthetic edges.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Per-search counters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub exact_matches: usize,
    pub semantic_matches: usize,
    pub graph_matches: usize,
    pub hybrid_matches: usize,
    pub total_time_ms: f64,
}

/// Full response for one search call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub entity_graph: EntityGraph,
    pub stats: SearchStats,
}
