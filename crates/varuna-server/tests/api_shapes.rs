//! API shape tests — validates that serialized engine output matches
//! what the dashboard frontend expects: camelCase field names, the
//! documented result/stats/context shapes.

use std::sync::Arc;

use varuna_core::EngineConfig;
use varuna_graph::build_knowledge_graph;
use varuna_rag::ContextBuilder;
use varuna_search::{HybridSearchEngine, SearchQuery};

fn engine() -> HybridSearchEngine {
    let graph = Arc::new(build_knowledge_graph().unwrap());
    HybridSearchEngine::new(graph, EngineConfig::default())
}

/// SearchResponse must serialize as
/// { query, results, entityGraph: {nodes, edges}, stats: {...} }.
#[test]
fn test_search_response_shape() {
    let engine = engine();
    let response = engine
        .search(&SearchQuery::new("bus crash with multiple casualties"))
        .unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert!(json["query"].is_string());
    assert!(json["results"].is_array());
    assert!(json["entityGraph"]["nodes"].is_array());
    assert!(json["entityGraph"]["edges"].is_array());
    assert!(json["stats"]["exactMatches"].is_number());
    assert!(json["stats"]["semanticMatches"].is_number());
    assert!(json["stats"]["graphMatches"].is_number());
    assert!(json["stats"]["totalTimeMs"].is_number());
}

/// Each result carries { node, score, matchType, explanation } with the
/// node's wire shape { id, type, name, keywords, importance,
/// exactMatchRequired }.
#[test]
fn test_search_result_shape() {
    let engine = engine();
    let response = engine.search(&SearchQuery::new("trauma blood")).unwrap();
    assert!(!response.results.is_empty());
    let json = serde_json::to_value(&response.results[0]).unwrap();

    assert!(json["node"]["id"].is_string());
    assert!(json["node"]["type"].is_string());
    assert!(json["node"]["name"].is_string());
    assert!(json["node"]["keywords"].is_array());
    assert!(json["node"]["importance"].is_number());
    assert!(json["node"]["exactMatchRequired"].is_boolean());
    assert!(json["score"].is_number());
    assert!(json["matchType"].is_string());
    assert!(json["explanation"].is_string());
}

/// Edges serialize as { sourceId, targetId, type, weight, bidirectional }.
#[test]
fn test_edge_shape() {
    let graph = build_knowledge_graph().unwrap();
    let json = serde_json::to_value(&graph.edges()[0]).unwrap();
    assert!(json["sourceId"].is_string());
    assert!(json["targetId"].is_string());
    assert!(json["type"].is_string());
    assert!(json["weight"].is_number());
    assert!(json["bidirectional"].is_boolean());
}

/// RagContext serializes as { knowledge, contextString, relationships,
/// confidence }.
#[test]
fn test_rag_context_shape() {
    let engine = engine();
    let context = ContextBuilder::new()
        .generate_context(&engine, "burn unit supplies", 800)
        .unwrap();
    let json = serde_json::to_value(&context).unwrap();

    assert!(json["knowledge"].is_array());
    assert!(json["contextString"].is_string());
    assert!(json["relationships"].is_array());
    assert!(json["confidence"].is_number());
}

/// The query wire shape accepted by POST /api/search.
#[test]
fn test_query_wire_shape_accepted() {
    let engine = engine();
    let query: SearchQuery = serde_json::from_str(
        r#"{
            "text": "chemical spill near loading dock",
            "exactMatchTerms": ["Burn Kit"],
            "nodeTypes": ["supply", "protocol"],
            "maxHops": 2,
            "minRelevance": 0.2,
            "limit": 10
        }"#,
    )
    .unwrap();
    let response = engine.search(&query).unwrap();
    assert!(response.results.len() <= 10);
}
