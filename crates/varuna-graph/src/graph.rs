//! In-memory knowledge graph backed by petgraph.
//!
//! The petgraph `DiGraph` is the adjacency cache: it is always an exact
//! derivation of the canonical edge list (bidirectional edges are mirrored
//! as two directed petgraph edges) and never a second source of truth.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use varuna_core::{Error, Result};

use crate::schema::{GraphEdge, GraphNode, NodeType};

/// The whole knowledge graph: node map, canonical edge list, and derived
/// adjacency. Built once at startup; immutable afterwards, so an
/// `Arc<KnowledgeGraph>` is safe to share across query tasks without
/// locking.
pub struct KnowledgeGraph {
    graph: DiGraph<GraphNode, GraphEdge>,
    node_index: HashMap<String, NodeIndex>,
    name_index: HashMap<(NodeType, String), String>,
    edges: Vec<GraphEdge>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_index: HashMap::new(),
            name_index: HashMap::new(),
            edges: Vec::new(),
        }
    }

    /// Insert a node. Duplicate ids are a construction error.
    pub fn add_node(&mut self, node: GraphNode) -> Result<()> {
        if self.node_index.contains_key(&node.id) {
            return Err(Error::Graph(format!(
                "duplicate node id {} ({} \"{}\")",
                node.id, node.node_type, node.name
            )));
        }
        self.name_index.insert(
            (node.node_type, node.name.to_lowercase()),
            node.id.clone(),
        );
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_index.insert(id, idx);
        Ok(())
    }

    /// Insert an edge. Both endpoints must already exist — an edge to a
    /// missing node is a hard construction error, never silently dropped.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<()> {
        let source = *self.node_index.get(&edge.source_id).ok_or_else(|| {
            Error::Graph(format!("edge references unknown source node {}", edge.source_id))
        })?;
        let target = *self.node_index.get(&edge.target_id).ok_or_else(|| {
            Error::Graph(format!("edge references unknown target node {}", edge.target_id))
        })?;

        if edge.bidirectional {
            self.graph.add_edge(target, source, edge.reversed());
        }
        self.graph.add_edge(source, target, edge.clone());
        self.edges.push(edge);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Resolve a node id by `(type, lower-cased name)`.
    pub fn id_by_name(&self, node_type: NodeType, name: &str) -> Option<&str> {
        self.name_index
            .get(&(node_type, name.to_lowercase()))
            .map(String::as_str)
    }

    /// Outgoing neighbor ids (includes the mirrored side of bidirectional
    /// edges).
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Outgoing)
    }

    /// Incoming neighbor ids.
    pub fn neighbors_reverse(&self, id: &str) -> Vec<&str> {
        self.neighbor_ids(id, Direction::Incoming)
    }

    fn neighbor_ids(&self, id: &str, dir: Direction) -> Vec<&str> {
        match self.node_index.get(id) {
            Some(&idx) => self
                .graph
                .neighbors_directed(idx, dir)
                .map(|n| self.graph[n].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Edges leaving a node, paired with the node at the far end. The
    /// mirrored side of a bidirectional edge appears here with source and
    /// target already oriented from this node's perspective.
    pub fn edges_from(&self, id: &str) -> Vec<(&GraphEdge, &GraphNode)> {
        self.adjacent(id, Direction::Outgoing)
    }

    /// Edges arriving at a node, paired with the node they come from.
    pub fn edges_to(&self, id: &str) -> Vec<(&GraphEdge, &GraphNode)> {
        self.adjacent(id, Direction::Incoming)
    }

    fn adjacent(&self, id: &str, dir: Direction) -> Vec<(&GraphEdge, &GraphNode)> {
        use petgraph::visit::EdgeRef;
        let Some(&idx) = self.node_index.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(idx, dir)
            .map(|e| {
                let other = if e.source() == idx { e.target() } else { e.source() };
                (e.weight(), &self.graph[other])
            })
            .collect()
    }

    /// Canonical edge list (bidirectional edges appear once).
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// Edges from the canonical list whose endpoints both satisfy the
    /// predicate — used to derive the induced sub-graph of a result set.
    pub fn edges_where(&self, mut contains: impl FnMut(&str) -> bool) -> Vec<&GraphEdge> {
        self.edges
            .iter()
            .filter(|e| contains(&e.source_id) && contains(&e.target_id))
            .collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Summary statistics for the stats endpoint and startup logging.
    pub fn stats(&self) -> GraphStats {
        let mut nodes_by_type: HashMap<String, usize> = HashMap::new();
        let mut exact_match_nodes = 0;
        for node in self.nodes() {
            *nodes_by_type
                .entry(node.node_type.as_str().to_string())
                .or_default() += 1;
            if node.exact_match_required {
                exact_match_nodes += 1;
            }
        }
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            nodes_by_type,
            exact_match_nodes,
        }
    }
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_type: HashMap<String, usize>,
    pub exact_match_nodes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GraphNode, NodeType, RelationType};

    fn node(node_type: NodeType, name: &str) -> GraphNode {
        GraphNode::new(node_type, name, 0.5)
    }

    fn edge(graph: &KnowledgeGraph, a: &str, b: &str, bidirectional: bool) -> GraphEdge {
        let source = graph.nodes().find(|n| n.name == a).unwrap();
        let target = graph.nodes().find(|n| n.name == b).unwrap();
        GraphEdge {
            source_id: source.id.clone(),
            target_id: target.id.clone(),
            relation: RelationType::Requires,
            weight: 0.9,
            bidirectional,
        }
    }

    fn two_node_graph(bidirectional: bool) -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(node(NodeType::Protocol, "Trauma Activation")).unwrap();
        graph.add_node(node(NodeType::Supply, "Chest Tube Kit")).unwrap();
        let e = edge(&graph, "Trauma Activation", "Chest Tube Kit", bidirectional);
        graph.add_edge(e).unwrap();
        graph
    }

    #[test]
    fn test_directed_edge_is_one_way() {
        let graph = two_node_graph(false);
        let protocol = graph.id_by_name(NodeType::Protocol, "trauma activation").unwrap();
        let supply = graph.id_by_name(NodeType::Supply, "chest tube kit").unwrap();
        assert_eq!(graph.neighbors(protocol), vec![supply]);
        assert!(graph.neighbors(supply).is_empty());
        assert_eq!(graph.neighbors_reverse(supply), vec![protocol]);
    }

    #[test]
    fn test_bidirectional_edge_recorded_symmetrically() {
        let graph = two_node_graph(true);
        let protocol = graph.id_by_name(NodeType::Protocol, "trauma activation").unwrap();
        let supply = graph.id_by_name(NodeType::Supply, "chest tube kit").unwrap();
        assert!(graph.neighbors(protocol).contains(&supply));
        assert!(graph.neighbors(supply).contains(&protocol));
        // Canonical edge list still holds a single entry
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_edge_to_missing_node_rejected() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(node(NodeType::Protocol, "Burn Protocol")).unwrap();
        let bad = GraphEdge {
            source_id: graph.nodes().next().unwrap().id.clone(),
            target_id: "supply-000000000000".into(),
            relation: RelationType::Requires,
            weight: 1.0,
            bidirectional: false,
        };
        let err = graph.add_edge(bad).unwrap_err();
        assert!(err.to_string().contains("unknown target node"));
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(node(NodeType::Supply, "Burn Kit")).unwrap();
        assert!(graph.add_node(node(NodeType::Supply, "Burn Kit")).is_err());
    }

    #[test]
    fn test_mirrored_edge_orientation() {
        let graph = two_node_graph(true);
        let supply = graph.id_by_name(NodeType::Supply, "chest tube kit").unwrap();
        let from_supply = graph.edges_from(supply);
        assert_eq!(from_supply.len(), 1);
        // The mirrored copy is oriented from the supply's perspective
        assert_eq!(from_supply[0].0.source_id, supply);
        assert_eq!(from_supply[0].1.name, "Trauma Activation");
    }

    #[test]
    fn test_stats_counts_by_type() {
        let graph = two_node_graph(false);
        let stats = graph.stats();
        assert_eq!(stats.node_count, 2);
        assert_eq!(stats.edge_count, 1);
        assert_eq!(stats.nodes_by_type.get("protocol"), Some(&1));
    }
}
