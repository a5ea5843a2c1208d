//! Engine and server configuration.
//!
//! Every scoring constant the search pipeline uses lives here with its
//! reference default, so the weights can be tuned without touching the
//! fusion logic.

use serde::{Deserialize, Serialize};

/// Scores assigned by the keyword and semantic phases of a hybrid search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Score for a caller-supplied exact-match term that resolves.
    #[serde(default = "default_exact_score")]
    pub exact_match: f64,
    /// Direct inverted-index hit on a node flagged exact-match-required.
    #[serde(default = "default_direct_flagged")]
    pub direct_hit_flagged: f64,
    /// Direct inverted-index hit on an ordinary node.
    #[serde(default = "default_direct")]
    pub direct_hit: f64,
    /// Substring match against an index key.
    #[serde(default = "default_partial")]
    pub partial_hit: f64,
    /// Contribution of each overlapping term in the semantic phase.
    #[serde(default = "default_semantic_step")]
    pub semantic_overlap: f64,
    /// Ceiling for the semantic phase score of a single node.
    #[serde(default = "default_semantic_cap")]
    pub semantic_cap: f64,
    /// Bonus applied when traversal rediscovers a keyword/semantic hit.
    #[serde(default = "default_hybrid_bonus")]
    pub hybrid_bonus: f64,
}

fn default_exact_score() -> f64 {
    1.0
}
fn default_direct_flagged() -> f64 {
    0.95
}
fn default_direct() -> f64 {
    0.8
}
fn default_partial() -> f64 {
    0.6
}
fn default_semantic_step() -> f64 {
    0.3
}
fn default_semantic_cap() -> f64 {
    0.75
}
fn default_hybrid_bonus() -> f64 {
    0.1
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            exact_match: default_exact_score(),
            direct_hit_flagged: default_direct_flagged(),
            direct_hit: default_direct(),
            partial_hit: default_partial(),
            semantic_overlap: default_semantic_step(),
            semantic_cap: default_semantic_cap(),
            hybrid_bonus: default_hybrid_bonus(),
        }
    }
}

/// Depth-decay parameters for graph traversal.
///
/// A node discovered at depth `d` (1-indexed) scores
/// `max(floor, base - decay * d)` — relevance decays with distance but
/// never reaches zero, so distant-but-reachable nodes stay surfaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraversalConfig {
    #[serde(default = "default_base")]
    pub base: f64,
    #[serde(default = "default_decay")]
    pub decay_per_hop: f64,
    #[serde(default = "default_floor")]
    pub floor: f64,
    /// Hop bound used when a query does not specify one.
    #[serde(default = "default_max_hops")]
    pub default_max_hops: usize,
    /// Hard upper bound on caller-requested hops.
    #[serde(default = "default_hop_cap")]
    pub max_hops_cap: usize,
    /// How many top-ranked keyword/semantic hits seed the traversal.
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,
}

fn default_base() -> f64 {
    0.7
}
fn default_decay() -> f64 {
    0.15
}
fn default_floor() -> f64 {
    0.2
}
fn default_max_hops() -> usize {
    2
}
fn default_hop_cap() -> usize {
    8
}
fn default_seed_count() -> usize {
    5
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            decay_per_hop: default_decay(),
            floor: default_floor(),
            default_max_hops: default_max_hops(),
            max_hops_cap: default_hop_cap(),
            seed_count: default_seed_count(),
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server port.
    pub port: u16,
    /// Engine tuning parameters.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3004);

        Self {
            port,
            engine: EngineConfig::default(),
        }
    }
}

impl ScoringConfig {
    /// Validate that all weights sit in [0, 1].
    pub fn validate(&self) -> crate::Result<()> {
        let fields = [
            ("exact_match", self.exact_match),
            ("direct_hit_flagged", self.direct_hit_flagged),
            ("direct_hit", self.direct_hit),
            ("partial_hit", self.partial_hit),
            ("semantic_overlap", self.semantic_overlap),
            ("semantic_cap", self.semantic_cap),
            ("hybrid_bonus", self.hybrid_bonus),
        ];
        for (name, value) in fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::Error::Config(format!(
                    "scoring.{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
