//! Bounded breadth-first graph exploration with depth-decayed scores.

use std::collections::{HashMap, HashSet};
use varuna_core::TraversalConfig;
use varuna_graph::{GraphEdge, GraphNode, KnowledgeGraph, RelationType};

/// Which edge directions to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalDirection {
    Outgoing,
    Incoming,
    Both,
}

/// Traversal bounds and filters.
pub struct TraversalOptions<'a> {
    pub max_hops: usize,
    pub direction: TraversalDirection,
    /// Only follow edges whose relation is in this allow-list.
    pub relation_filter: Option<&'a [RelationType]>,
    /// Evaluated per candidate before enqueuing; returning true prunes
    /// the node (and everything behind it).
    pub stop: Option<&'a dyn Fn(&GraphNode) -> bool>,
}

impl<'a> TraversalOptions<'a> {
    pub fn new(max_hops: usize) -> Self {
        Self {
            max_hops,
            direction: TraversalDirection::Both,
            relation_filter: None,
            stop: None,
        }
    }
}

/// A node discovered by traversal.
#[derive(Debug, Clone)]
pub struct TraversalHit {
    /// Depth-decayed relevance.
    pub score: f64,
    /// 1-indexed hop count from the nearest seed.
    pub depth: usize,
    /// Node ids from the seed to this node, inclusive.
    pub path: Vec<String>,
}

/// Breadth-first expansion from a seed frontier. Each node is visited at
/// most once — the global visited set makes cycles (e.g. bidirectional
/// staff ↔ department edges) terminate. Seeds themselves are not
/// reported; only newly discovered nodes are.
pub fn traverse(
    graph: &KnowledgeGraph,
    config: &TraversalConfig,
    seeds: &[String],
    options: &TraversalOptions<'_>,
) -> HashMap<String, TraversalHit> {
    let mut results: HashMap<String, TraversalHit> = HashMap::new();
    let mut visited: HashSet<String> = seeds.iter().cloned().collect();
    let mut frontier: Vec<Vec<String>> = seeds
        .iter()
        .filter(|id| graph.get(id).is_some())
        .map(|id| vec![id.clone()])
        .collect();

    for depth in 1..=options.max_hops {
        if frontier.is_empty() {
            break;
        }
        let score = (config.base - config.decay_per_hop * depth as f64).max(config.floor);
        let mut next_frontier = Vec::new();

        for path in &frontier {
            let current = path.last().expect("frontier paths are non-empty");
            for (edge, neighbor) in adjacent(graph, current, options.direction) {
                if visited.contains(&neighbor.id) {
                    continue;
                }
                if let Some(allowed) = options.relation_filter {
                    if !allowed.contains(&edge.relation) {
                        continue;
                    }
                }
                if let Some(stop) = options.stop {
                    if stop(neighbor) {
                        continue;
                    }
                }
                visited.insert(neighbor.id.clone());
                let mut node_path = path.clone();
                node_path.push(neighbor.id.clone());
                results.insert(
                    neighbor.id.clone(),
                    TraversalHit {
                        score,
                        depth,
                        path: node_path.clone(),
                    },
                );
                next_frontier.push(node_path);
            }
        }
        frontier = next_frontier;
    }
    results
}

fn adjacent<'g>(
    graph: &'g KnowledgeGraph,
    id: &str,
    direction: TraversalDirection,
) -> Vec<(&'g GraphEdge, &'g GraphNode)> {
    match direction {
        TraversalDirection::Outgoing => graph.edges_from(id),
        TraversalDirection::Incoming => graph.edges_to(id),
        TraversalDirection::Both => {
            let mut all = graph.edges_from(id);
            all.extend(graph.edges_to(id));
            all
        }
    }
}
