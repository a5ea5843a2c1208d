//! Inverted keyword index and exact-match cache, derived from the graph.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::graph::KnowledgeGraph;

/// Read-only lookup structures built once from a finished graph.
///
/// The inverted index maps every lower-cased node keyword to the ids of
/// the nodes carrying it. The exact-match cache maps lower-cased node
/// names to ids, but only for nodes flagged `exact_match_required` —
/// those are the entities (blood types, named kits, named drugs) that
/// must be retrievable by exact name and never substituted.
pub struct KeywordIndex {
    keyword_index: HashMap<String, HashSet<String>>,
    exact_match_cache: HashMap<String, String>,
}

impl KeywordIndex {
    pub fn build(graph: &KnowledgeGraph) -> Self {
        let mut keyword_index: HashMap<String, HashSet<String>> = HashMap::new();
        let mut exact_match_cache = HashMap::new();

        for node in graph.nodes() {
            for keyword in &node.keywords {
                let keyword = keyword.trim().to_lowercase();
                if keyword.is_empty() {
                    continue;
                }
                keyword_index
                    .entry(keyword)
                    .or_default()
                    .insert(node.id.clone());
            }
            if node.exact_match_required {
                exact_match_cache.insert(node.name.to_lowercase(), node.id.clone());
            }
        }

        debug!(
            keywords = keyword_index.len(),
            exact_entries = exact_match_cache.len(),
            "keyword index built"
        );

        Self {
            keyword_index,
            exact_match_cache,
        }
    }

    /// O(1) exact-name lookup. Returns nothing unless the term is the
    /// exact (case-insensitive) name of an exact-match-required node.
    pub fn exact_lookup(&self, term: &str) -> Option<&str> {
        self.exact_match_cache
            .get(&term.trim().to_lowercase())
            .map(String::as_str)
    }

    /// O(1) inverted-index lookup for a single token.
    pub fn keyword_lookup(&self, term: &str) -> Option<&HashSet<String>> {
        self.keyword_index.get(&term.trim().to_lowercase())
    }

    /// Iterate index keys with their id sets, for substring matching.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &HashSet<String>)> {
        self.keyword_index.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keyword_count(&self) -> usize {
        self.keyword_index.len()
    }

    pub fn exact_entry_count(&self) -> usize {
        self.exact_match_cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GraphNode, NodeType};

    fn fixture_graph() -> KnowledgeGraph {
        let mut graph = KnowledgeGraph::new();
        graph
            .add_node(
                GraphNode::new(NodeType::Supply, "O-Negative Blood", 1.0)
                    .keywords(&["o-negative", "o neg", "universal donor", "blood"])
                    .exact(),
            )
            .unwrap();
        graph
            .add_node(
                GraphNode::new(NodeType::Condition, "Hemorrhagic Shock", 0.9)
                    .keywords(&["bleeding", "blood loss", "shock"]),
            )
            .unwrap();
        graph
    }

    #[test]
    fn test_exact_cache_only_holds_flagged_nodes() {
        let graph = fixture_graph();
        let index = KeywordIndex::build(&graph);
        assert!(index.exact_lookup("O-Negative Blood").is_some());
        assert!(index.exact_lookup("o-negative blood").is_some());
        assert!(index.exact_lookup("Hemorrhagic Shock").is_none());
        assert_eq!(index.exact_entry_count(), 1);
    }

    #[test]
    fn test_keyword_lookup_collects_all_carriers() {
        let graph = fixture_graph();
        let index = KeywordIndex::build(&graph);
        // "blood" is a keyword on the supply; "blood loss" on the condition
        let ids = index.keyword_lookup("blood").unwrap();
        assert_eq!(ids.len(), 1);
        assert!(index.keyword_lookup("shock").is_some());
        assert!(index.keyword_lookup("plasma").is_none());
    }

    #[test]
    fn test_lookup_trims_and_lowercases() {
        let graph = fixture_graph();
        let index = KeywordIndex::build(&graph);
        assert!(index.keyword_lookup("  Universal Donor ").is_some());
    }
}
