//! Hybrid search engine — keyword, semantic, and traversal fusion.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;
use varuna_core::{EngineConfig, Result};
use varuna_graph::{KeywordIndex, KnowledgeGraph, NodeType};

use crate::expand::{tokenize, SemanticExpander, SynonymExpander};
use crate::traverse::{traverse, TraversalOptions};
use crate::types::*;

/// Orchestrates the three retrieval strategies over one query and fuses
/// their results into a single ranked list.
///
/// Holds the graph behind an `Arc` and builds the keyword index at
/// construction; everything afterwards is pure read-only computation, so
/// one engine instance serves any number of concurrent queries.
pub struct HybridSearchEngine {
    graph: Arc<KnowledgeGraph>,
    index: KeywordIndex,
    expander: Box<dyn SemanticExpander>,
    config: EngineConfig,
}

/// Per-node accumulator used during fusion.
struct Candidate {
    score: f64,
    match_type: MatchType,
    explanation: String,
    path: Option<Vec<String>>,
}

impl HybridSearchEngine {
    pub fn new(graph: Arc<KnowledgeGraph>, config: EngineConfig) -> Self {
        Self::with_expander(graph, config, Box::new(SynonymExpander::new()))
    }

    /// Construct with a custom expander (e.g. an embedding index).
    pub fn with_expander(
        graph: Arc<KnowledgeGraph>,
        config: EngineConfig,
        expander: Box<dyn SemanticExpander>,
    ) -> Self {
        let index = KeywordIndex::build(&graph);
        Self {
            graph,
            index,
            expander,
            config,
        }
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a full hybrid search.
    pub fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        query.validate(self.config.traversal.max_hops_cap)?;
        let started = Instant::now();

        let mut candidates: HashMap<String, Candidate> = HashMap::new();
        self.keyword_phase(query, &mut candidates);
        self.semantic_phase(query, &mut candidates);
        self.traversal_phase(query, &mut candidates);

        let mut results = self.assemble(candidates);

        if let Some(min) = query.min_relevance {
            results.retain(|r| r.score >= min);
        }
        sort_results(&mut results);
        if let Some(limit) = query.limit {
            results.truncate(limit);
        }

        let entity_graph = self.induced_graph(&results);
        let stats = build_stats(&results, started);

        debug!(
            query = %query.text,
            results = results.len(),
            elapsed_ms = stats.total_time_ms,
            "hybrid search complete"
        );

        Ok(SearchResponse {
            query: query.text.clone(),
            results,
            entity_graph,
            stats,
        })
    }

    /// Exact-resource lookup — the anti-hallucination contract.
    ///
    /// For nodes flagged exact-match-required, a (case-insensitive) name
    /// hit always returns that precise node with score 1.0; callers may
    /// treat the returned name as ground truth. Anything else is a
    /// best-effort keyword fallback over supplies and medications,
    /// explicitly tagged with lower confidence.
    pub fn find_exact_supply(&self, name: &str) -> Option<SearchResult> {
        if let Some(id) = self.index.exact_lookup(name) {
            let node = self.graph.get(id)?;
            return Some(SearchResult {
                node: node.clone(),
                score: self.config.scoring.exact_match,
                match_type: MatchType::Exact,
                explanation: format!("Verified exact match for \"{}\"", node.name),
                graph_path: None,
                relationships: Some(self.relationships_of(id)),
            });
        }

        let mut fallback = SearchQuery::new(name);
        fallback.node_types = Some(vec![NodeType::Supply, NodeType::Medication]);
        let response = self.search(&fallback).ok()?;
        let top = response
            .results
            .into_iter()
            .find(|r| matches!(r.node.node_type, NodeType::Supply | NodeType::Medication))?;
        // Never report fallback certainty at the verified-exact level.
        let capped = top.score.min(self.config.scoring.direct_hit_flagged);
        Some(SearchResult {
            score: capped,
            explanation: format!(
                "No exact entry for \"{name}\"; best-effort fallback to \"{}\" — verify before use",
                top.node.name
            ),
            ..top
        })
    }

    // -----------------------------------------------------------------
    // Fusion phases
    // -----------------------------------------------------------------

    fn keyword_phase(&self, query: &SearchQuery, candidates: &mut HashMap<String, Candidate>) {
        let scoring = &self.config.scoring;

        // Caller-supplied exact terms bypass fuzzy matching entirely.
        // Unknown names contribute nothing.
        for term in &query.exact_match_terms {
            if let Some(id) = self.index.exact_lookup(term) {
                upsert(
                    candidates,
                    id,
                    scoring.exact_match,
                    MatchType::Exact,
                    format!("Exact match for \"{term}\""),
                );
            }
        }

        for token in tokenize(&query.text) {
            // Direct inverted-index hits
            if let Some(ids) = self.index.keyword_lookup(&token) {
                for id in ids {
                    let Some(node) = self.graph.get(id) else { continue };
                    if !self.type_allowed(query, node.node_type) {
                        continue;
                    }
                    let score = if node.exact_match_required {
                        scoring.direct_hit_flagged
                    } else {
                        scoring.direct_hit
                    };
                    upsert(
                        candidates,
                        id,
                        score,
                        MatchType::Exact,
                        format!("Direct keyword match on \"{token}\""),
                    );
                }
            }

            // Substring hits against index keys
            if token.len() < 3 {
                continue;
            }
            for (key, ids) in self.index.entries() {
                if key == token || !(key.contains(&token) || token.contains(key)) {
                    continue;
                }
                for id in ids {
                    let Some(node) = self.graph.get(id) else { continue };
                    if !self.type_allowed(query, node.node_type) {
                        continue;
                    }
                    upsert(
                        candidates,
                        id,
                        scoring.partial_hit,
                        MatchType::Exact,
                        format!("Partial keyword match (\"{token}\" ~ \"{key}\")"),
                    );
                }
            }
        }
    }

    fn semantic_phase(&self, query: &SearchQuery, candidates: &mut HashMap<String, Candidate>) {
        let expanded = self.expander.expand(&query.text);
        if expanded.is_empty() {
            return;
        }
        let scoring = &self.config.scoring;

        for node in self.graph.nodes() {
            if !self.type_allowed(query, node.node_type) {
                continue;
            }
            let overlaps = expanded
                .iter()
                .filter(|term| {
                    node.keywords.iter().any(|kw| {
                        kw == *term
                            || (term.len() >= 3
                                && (kw.contains(term.as_str()) || term.contains(kw.as_str())))
                    })
                })
                .count();
            if overlaps == 0 {
                continue;
            }
            let score = (overlaps as f64 * scoring.semantic_overlap).min(scoring.semantic_cap);
            upsert(
                candidates,
                &node.id,
                score,
                MatchType::Semantic,
                format!("Synonym expansion overlap on {overlaps} term(s)"),
            );
        }
    }

    fn traversal_phase(&self, query: &SearchQuery, candidates: &mut HashMap<String, Candidate>) {
        if candidates.is_empty() {
            return;
        }
        let traversal = &self.config.traversal;

        // Seed from the strongest hits only — traversal from every match
        // would fan out over most of the graph.
        let mut seeds: Vec<(&String, f64, f64)> = candidates
            .iter()
            .map(|(id, c)| {
                let importance = self.graph.get(id).map(|n| n.importance).unwrap_or(0.0);
                (id, c.score, importance)
            })
            .collect();
        seeds.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal))
                .then(a.0.cmp(b.0))
        });
        let seed_ids: Vec<String> = seeds
            .into_iter()
            .take(traversal.seed_count)
            .map(|(id, _, _)| id.clone())
            .collect();

        let max_hops = query.max_hops.unwrap_or(traversal.default_max_hops);
        let hits = traverse(
            &self.graph,
            traversal,
            &seed_ids,
            &TraversalOptions::new(max_hops),
        );

        let bonus = self.config.scoring.hybrid_bonus;
        for (id, hit) in hits {
            match candidates.get_mut(&id) {
                Some(existing) => {
                    existing.score = (existing.score + bonus).min(1.0);
                    existing.match_type = MatchType::Hybrid;
                    existing.path = Some(hit.path);
                    existing.explanation.push_str(" + graph connection");
                }
                None => {
                    candidates.insert(
                        id,
                        Candidate {
                            score: hit.score,
                            match_type: MatchType::Graph,
                            explanation: format!(
                                "Discovered by graph traversal ({} hop{})",
                                hit.depth,
                                if hit.depth == 1 { "" } else { "s" }
                            ),
                            path: Some(hit.path),
                        },
                    );
                }
            }
        }
    }

    // -----------------------------------------------------------------
    // Assembly
    // -----------------------------------------------------------------

    fn assemble(&self, candidates: HashMap<String, Candidate>) -> Vec<SearchResult> {
        candidates
            .into_iter()
            .filter_map(|(id, candidate)| {
                let node = self.graph.get(&id)?.clone();
                let graph_path = candidate.path.as_ref().map(|path| {
                    path.iter()
                        .filter_map(|pid| self.graph.get(pid).cloned())
                        .collect()
                });
                let relationships = match candidate.match_type {
                    MatchType::Graph => Some(self.relationships_of(&id)),
                    _ => None,
                };
                Some(SearchResult {
                    node,
                    score: candidate.score,
                    match_type: candidate.match_type,
                    explanation: candidate.explanation,
                    graph_path,
                    relationships,
                })
            })
            .collect()
    }

    fn relationships_of(&self, id: &str) -> Vec<Relationship> {
        self.graph
            .edges_from(id)
            .into_iter()
            .map(|(edge, related)| Relationship {
                edge: edge.clone(),
                related_node: related.clone(),
            })
            .collect()
    }

    fn induced_graph(&self, results: &[SearchResult]) -> EntityGraph {
        let ids: std::collections::HashSet<&str> =
            results.iter().map(|r| r.node.id.as_str()).collect();
        let edges = self
            .graph
            .edges_where(|id| ids.contains(id))
            .into_iter()
            .cloned()
            .collect();
        EntityGraph {
            nodes: results.iter().map(|r| r.node.clone()).collect(),
            edges,
        }
    }

    fn type_allowed(&self, query: &SearchQuery, node_type: NodeType) -> bool {
        match &query.node_types {
            Some(types) => types.contains(&node_type),
            None => true,
        }
    }
}

/// Keep the higher score when a node is found by more than one strategy.
fn upsert(
    candidates: &mut HashMap<String, Candidate>,
    id: &str,
    score: f64,
    match_type: MatchType,
    explanation: String,
) {
    match candidates.get_mut(id) {
        Some(existing) => {
            if score > existing.score {
                existing.score = score;
                existing.match_type = match_type;
                existing.explanation = explanation;
            }
        }
        None => {
            candidates.insert(
                id.to_string(),
                Candidate {
                    score,
                    match_type,
                    explanation,
                    path: None,
                },
            );
        }
    }
}

/// Descending by score; node importance then id break ties so that
/// result order is deterministic.
fn sort_results(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                b.node
                    .importance
                    .partial_cmp(&a.node.importance)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then(a.node.id.cmp(&b.node.id))
    });
}

fn build_stats(results: &[SearchResult], started: Instant) -> SearchStats {
    let mut stats = SearchStats {
        total_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        ..Default::default()
    };
    for result in results {
        match result.match_type {
            MatchType::Exact => stats.exact_matches += 1,
            MatchType::Semantic => stats.semantic_matches += 1,
            MatchType::Graph => stats.graph_matches += 1,
            MatchType::Hybrid => stats.hybrid_matches += 1,
        }
    }
    stats
}
