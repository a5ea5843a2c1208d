//! Greedy, token-budgeted serialization of search results.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;
use varuna_core::Result;
use varuna_search::{HybridSearchEngine, SearchQuery, SearchResult};

/// Fixed instructional footer — a prompt-safety contract for the
/// consuming generator, always appended.
pub const SAFETY_FOOTER: &str = "IMPORTANT: Use the exact supply and medication names listed \
above. Never substitute, paraphrase, or invent item names.";

/// Estimated token cost of a text block: characters / 4, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Serialized grounding material for one query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RagContext {
    /// The results included in the context, in rank order.
    pub knowledge: Vec<SearchResult>,
    pub context_string: String,
    /// Deduplicated `Source RELATION Target` lines.
    pub relationships: Vec<String>,
    /// Top result score, or 0 when nothing matched.
    pub confidence: f64,
}

/// Builds RAG contexts from engine searches.
pub struct ContextBuilder {
    /// Hop bound for the underlying search.
    pub max_hops: usize,
    /// Relevance floor for the underlying search.
    pub min_relevance: f64,
    /// Outgoing relationship lines serialized per included node.
    pub max_relationships_per_node: usize,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self {
            max_hops: 2,
            min_relevance: 0.3,
            max_relationships_per_node: 3,
        }
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a search and serialize the top results into a context block
    /// whose estimated token count stays within `max_tokens`. The safety
    /// footer is always appended; its cost is reserved up front.
    pub fn generate_context(
        &self,
        engine: &HybridSearchEngine,
        query: &str,
        max_tokens: usize,
    ) -> Result<RagContext> {
        let mut search = SearchQuery::new(query);
        search.max_hops = Some(self.max_hops);
        search.min_relevance = Some(self.min_relevance);
        let response = engine.search(&search)?;

        let budget = max_tokens.saturating_sub(estimate_tokens(SAFETY_FOOTER));
        let mut used = 0usize;
        let mut entries: Vec<String> = Vec::new();
        let mut relationship_lines: Vec<String> = Vec::new();
        let mut seen_relationships: HashSet<String> = HashSet::new();
        let mut knowledge: Vec<SearchResult> = Vec::new();

        for result in &response.results {
            let entry = format_entry(result);
            let cost = estimate_tokens(&entry);
            if used + cost > budget {
                break;
            }
            used += cost;
            entries.push(entry);
            knowledge.push(result.clone());

            for (edge, related) in engine
                .graph()
                .edges_from(&result.node.id)
                .into_iter()
                .take(self.max_relationships_per_node)
            {
                let line = format!("{} {} {}", result.node.name, edge.relation, related.name);
                if !seen_relationships.insert(line.clone()) {
                    continue;
                }
                let line_cost = estimate_tokens(&line);
                if used + line_cost > budget {
                    break;
                }
                used += line_cost;
                relationship_lines.push(line);
            }
        }

        let confidence = response.results.first().map(|r| r.score).unwrap_or(0.0);
        let context_string = assemble(&entries, &relationship_lines);

        debug!(
            query,
            included = knowledge.len(),
            estimated_tokens = used,
            "rag context generated"
        );

        Ok(RagContext {
            knowledge,
            context_string,
            relationships: relationship_lines,
            confidence,
        })
    }
}

/// `[TYPE] Name (prop: value, …)` with properties in key order.
fn format_entry(result: &SearchResult) -> String {
    let node = &result.node;
    let mut props: Vec<(&String, &serde_json::Value)> = node.properties.iter().collect();
    props.sort_by_key(|(k, _)| k.as_str());

    if props.is_empty() {
        return format!("[{}] {}", node.node_type.label(), node.name);
    }
    let rendered: Vec<String> = props
        .iter()
        .map(|(k, v)| match v {
            serde_json::Value::String(s) => format!("{k}: {s}"),
            other => format!("{k}: {other}"),
        })
        .collect();
    format!(
        "[{}] {} ({})",
        node.node_type.label(),
        node.name,
        rendered.join(", ")
    )
}

fn assemble(entries: &[String], relationships: &[String]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(entry);
        out.push('\n');
    }
    if !relationships.is_empty() {
        out.push_str("\nKey Relationships:\n");
        for line in relationships {
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push('\n');
    out.push_str(SAFETY_FOOTER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use varuna_core::EngineConfig;
    use varuna_graph::build_knowledge_graph;

    fn engine() -> HybridSearchEngine {
        let graph = Arc::new(build_knowledge_graph().unwrap());
        HybridSearchEngine::new(graph, EngineConfig::default())
    }

    #[test]
    fn test_footer_always_present() {
        let engine = engine();
        let builder = ContextBuilder::new();
        let context = builder.generate_context(&engine, "bus crash", 500).unwrap();
        assert!(context.context_string.ends_with(SAFETY_FOOTER));

        let empty = builder.generate_context(&engine, "", 500).unwrap();
        assert!(empty.context_string.ends_with(SAFETY_FOOTER));
    }

    #[test]
    fn test_token_budget_respected() {
        let engine = engine();
        let builder = ContextBuilder::new();
        for max_tokens in [30, 60, 120, 400] {
            let context = builder
                .generate_context(&engine, "trauma blood fire casualties", max_tokens)
                .unwrap();
            let footer_cost = estimate_tokens(SAFETY_FOOTER);
            let entry_cost: usize = context
                .knowledge
                .iter()
                .map(|r| estimate_tokens(&format_entry(r)))
                .sum::<usize>()
                + context
                    .relationships
                    .iter()
                    .map(|l| estimate_tokens(l))
                    .sum::<usize>();
            assert!(
                entry_cost + footer_cost <= max_tokens.max(footer_cost),
                "budget {max_tokens} exceeded: {entry_cost} + footer {footer_cost}"
            );
        }
    }

    #[test]
    fn test_small_budget_includes_fewer_entries() {
        let engine = engine();
        let builder = ContextBuilder::new();
        let small = builder.generate_context(&engine, "bus crash casualties", 60).unwrap();
        let large = builder.generate_context(&engine, "bus crash casualties", 2000).unwrap();
        assert!(small.knowledge.len() <= large.knowledge.len());
    }

    #[test]
    fn test_confidence_zero_when_no_results() {
        let engine = engine();
        let builder = ContextBuilder::new();
        let context = builder.generate_context(&engine, "", 500).unwrap();
        assert_eq!(context.confidence, 0.0);
        assert!(context.knowledge.is_empty());
    }

    #[test]
    fn test_confidence_is_top_score() {
        let engine = engine();
        let builder = ContextBuilder::new();
        let context = builder
            .generate_context(&engine, "bus crash with casualties", 2000)
            .unwrap();
        assert!(!context.knowledge.is_empty());
        assert_eq!(context.confidence, context.knowledge[0].score);
    }

    #[test]
    fn test_relationship_lines_deduplicated() {
        let engine = engine();
        let builder = ContextBuilder::new();
        let context = builder
            .generate_context(&engine, "trauma blood transfusion", 2000)
            .unwrap();
        let unique: HashSet<&String> = context.relationships.iter().collect();
        assert_eq!(unique.len(), context.relationships.len());
    }

    #[test]
    fn test_entry_format() {
        let engine = engine();
        let builder = ContextBuilder::new();
        let context = builder.generate_context(&engine, "o-negative blood", 2000).unwrap();
        assert!(
            context.context_string.contains("[SUPPLY] O-Negative Blood"),
            "context was: {}",
            context.context_string
        );
    }

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }
}
