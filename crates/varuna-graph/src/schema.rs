//! Typed node and edge definitions for the knowledge graph.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Closed enumeration of domain entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    EmergencyType,
    Protocol,
    Resource,
    Staff,
    Department,
    Procedure,
    Condition,
    Medication,
    Symptom,
    Equipment,
    Supply,
}

impl NodeType {
    /// Stable lowercase identifier used in node ids and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmergencyType => "emergency_type",
            Self::Protocol => "protocol",
            Self::Resource => "resource",
            Self::Staff => "staff",
            Self::Department => "department",
            Self::Procedure => "procedure",
            Self::Condition => "condition",
            Self::Medication => "medication",
            Self::Symptom => "symptom",
            Self::Equipment => "equipment",
            Self::Supply => "supply",
        }
    }

    /// Uppercase label used in serialized RAG context entries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EmergencyType => "EMERGENCY",
            Self::Protocol => "PROTOCOL",
            Self::Resource => "RESOURCE",
            Self::Staff => "STAFF",
            Self::Department => "DEPARTMENT",
            Self::Procedure => "PROCEDURE",
            Self::Condition => "CONDITION",
            Self::Medication => "MEDICATION",
            Self::Symptom => "SYMPTOM",
            Self::Equipment => "EQUIPMENT",
            Self::Supply => "SUPPLY",
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed enumeration of relationship kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationType {
    Requires,
    Activates,
    Treats,
    Indicates,
    SpecializesIn,
    LocatedIn,
    PartOf,
    Contraindicated,
    AlternativeTo,
    EscalatesTo,
    Uses,
    Alerts,
    Supplies,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requires => "REQUIRES",
            Self::Activates => "ACTIVATES",
            Self::Treats => "TREATS",
            Self::Indicates => "INDICATES",
            Self::SpecializesIn => "SPECIALIZES_IN",
            Self::LocatedIn => "LOCATED_IN",
            Self::PartOf => "PART_OF",
            Self::Contraindicated => "CONTRAINDICATED",
            Self::AlternativeTo => "ALTERNATIVE_TO",
            Self::EscalatesTo => "ESCALATES_TO",
            Self::Uses => "USES",
            Self::Alerts => "ALERTS",
            Self::Supplies => "SUPPLIES",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive a stable node id from `(type, name)`.
///
/// Rebuilding the graph from the same source data yields identical ids,
/// so relationship tables authored by name resolve consistently.
pub fn node_id(node_type: NodeType, name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(node_type.as_str().as_bytes());
    hasher.update(b":");
    hasher.update(name.to_lowercase().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("{}-{}", node_type.as_str(), &digest[..12])
}

/// A domain entity in the knowledge graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub name: String,
    /// Lower-cased terms (name plus synonyms) used for indexing.
    pub keywords: Vec<String>,
    /// Open key → value map of domain attributes (dosage, bed count, …).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: HashMap<String, serde_json::Value>,
    /// Relevance weight in [0, 1], a tie-breaker rather than a score.
    pub importance: f64,
    /// Marks entities (blood types, named kits, named drugs) for which a
    /// near-match substitute is unsafe.
    pub exact_match_required: bool,
}

impl GraphNode {
    /// Create a node with the id derived from `(type, name)`. The
    /// lower-cased name is always present in `keywords`.
    pub fn new(node_type: NodeType, name: &str, importance: f64) -> Self {
        Self {
            id: node_id(node_type, name),
            node_type,
            name: name.to_string(),
            keywords: vec![name.to_lowercase()],
            properties: HashMap::new(),
            importance,
            exact_match_required: false,
        }
    }

    /// Add indexing keywords (lower-cased, trimmed).
    pub fn keywords(mut self, terms: &[&str]) -> Self {
        for term in terms {
            let term = term.trim().to_lowercase();
            if !term.is_empty() && !self.keywords.contains(&term) {
                self.keywords.push(term);
            }
        }
        self
    }

    /// Attach a domain attribute.
    pub fn property(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Flag the node as requiring exact-name retrieval.
    pub fn exact(mut self) -> Self {
        self.exact_match_required = true;
        self
    }
}

/// A directed (optionally bidirectional) relationship between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source_id: String,
    pub target_id: String,
    #[serde(rename = "type")]
    pub relation: RelationType,
    /// Relationship strength in [0, 1].
    pub weight: f64,
    pub bidirectional: bool,
}

impl GraphEdge {
    /// The edge with source and target swapped, for bidirectional mirroring.
    pub fn reversed(&self) -> Self {
        Self {
            source_id: self.target_id.clone(),
            target_id: self.source_id.clone(),
            relation: self.relation,
            weight: self.weight,
            bidirectional: self.bidirectional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_is_deterministic() {
        let a = node_id(NodeType::Supply, "O-Negative Blood");
        let b = node_id(NodeType::Supply, "O-Negative Blood");
        assert_eq!(a, b);
        assert!(a.starts_with("supply-"));
    }

    #[test]
    fn test_node_id_is_case_insensitive_on_name() {
        assert_eq!(
            node_id(NodeType::Supply, "Burn Kit"),
            node_id(NodeType::Supply, "burn kit")
        );
    }

    #[test]
    fn test_node_id_differs_across_types() {
        assert_ne!(
            node_id(NodeType::Supply, "Morphine"),
            node_id(NodeType::Medication, "Morphine")
        );
    }

    #[test]
    fn test_new_node_keywords_include_name() {
        let node = GraphNode::new(NodeType::Protocol, "Trauma Activation", 0.9);
        assert!(node.keywords.contains(&"trauma activation".to_string()));
    }

    #[test]
    fn test_keywords_deduplicate_and_lowercase() {
        let node = GraphNode::new(NodeType::Supply, "Burn Kit", 0.8)
            .keywords(&["Burn Kit", "  BURNS ", "kit"]);
        assert_eq!(
            node.keywords,
            vec!["burn kit".to_string(), "burns".to_string(), "kit".to_string()]
        );
    }

    #[test]
    fn test_relation_serializes_screaming_snake() {
        let json = serde_json::to_string(&RelationType::SpecializesIn).unwrap();
        assert_eq!(json, "\"SPECIALIZES_IN\"");
    }

    #[test]
    fn test_node_type_serializes_snake_case() {
        let json = serde_json::to_string(&NodeType::EmergencyType).unwrap();
        assert_eq!(json, "\"emergency_type\"");
    }
}
