//! Synonym-based query expansion.
//!
//! This is a hand-authored heuristic for a small closed domain, not an
//! embedding similarity model — its score contributions are not
//! calibrated probabilities. The trait seam exists so a real embedding
//! index can replace it without touching the fusion logic.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Widens a free-text query into a broadened term set.
pub trait SemanticExpander: Send + Sync {
    fn expand(&self, query: &str) -> HashSet<String>;
}

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9][a-z0-9-]*").unwrap());

/// Lower-cased word tokens of a query.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Domain synonym clusters: cluster key plus member terms. A token that
/// overlaps the key or any member (substring, either direction) pulls in
/// the whole cluster.
static SYNONYM_CLUSTERS: Lazy<Vec<(&'static str, &'static [&'static str])>> = Lazy::new(|| {
    vec![
        ("crash", &["accident", "collision", "trauma", "vehicle", "wreck", "pileup"][..]),
        ("fire", &["burn", "smoke", "thermal", "flame", "blaze"][..]),
        ("blood", &["transfusion", "hemorrhage", "bleeding"][..]),
        ("breathing", &["respiratory", "airway", "oxygen", "ventilation", "hypoxia"][..]),
        ("heart", &["cardiac", "arrest", "pulse"][..]),
        ("chemical", &["hazmat", "toxic", "contamination", "exposure", "spill"][..]),
        ("collapse", &["crush", "rubble", "earthquake", "structural"][..]),
        ("casualties", &["mass", "multiple", "victims", "mci", "surge"][..]),
        ("gunshot", &["shooting", "shooter", "gsw", "penetrating"][..]),
        ("pain", &["analgesic", "opioid"][..]),
        ("child", &["pediatric", "infant"][..]),
        ("overdose", &["narcotic", "reversal"][..]),
    ]
});

// Substring matching on very short tokens ("o2", "iv") produces noise,
// so those only match exactly.
const MIN_FUZZY_LEN: usize = 3;

fn overlaps(token: &str, term: &str) -> bool {
    if token == term {
        return true;
    }
    if token.len() < MIN_FUZZY_LEN || term.len() < MIN_FUZZY_LEN {
        return false;
    }
    token.contains(term) || term.contains(token)
}

/// Fixed synonym-table expander.
#[derive(Debug, Default)]
pub struct SynonymExpander;

impl SynonymExpander {
    pub fn new() -> Self {
        Self
    }
}

impl SemanticExpander for SynonymExpander {
    fn expand(&self, query: &str) -> HashSet<String> {
        let tokens = tokenize(query);
        let mut terms: HashSet<String> = tokens.iter().cloned().collect();

        for token in &tokens {
            for (key, members) in SYNONYM_CLUSTERS.iter() {
                let hit = overlaps(token, key) || members.iter().any(|m| overlaps(token, m));
                if hit {
                    terms.insert((*key).to_string());
                    terms.extend(members.iter().map(|m| (*m).to_string()));
                }
            }
        }
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        assert_eq!(
            tokenize("Bus CRASH, multiple casualties!"),
            vec!["bus", "crash", "multiple", "casualties"]
        );
    }

    #[test]
    fn test_tokenize_keeps_hyphenated_terms() {
        assert_eq!(tokenize("O-Negative blood"), vec!["o-negative", "blood"]);
    }

    #[test]
    fn test_empty_query_expands_to_nothing() {
        let expander = SynonymExpander::new();
        assert!(expander.expand("").is_empty());
        assert!(expander.expand("   ").is_empty());
    }

    #[test]
    fn test_crash_pulls_in_trauma_cluster() {
        let expander = SynonymExpander::new();
        let terms = expander.expand("bus crash");
        assert!(terms.contains("trauma"));
        assert!(terms.contains("collision"));
        assert!(terms.contains("vehicle"));
        // Original tokens are preserved
        assert!(terms.contains("bus"));
        assert!(terms.contains("crash"));
    }

    #[test]
    fn test_substring_overlap_matches_cluster() {
        let expander = SynonymExpander::new();
        // "burning" overlaps member "burn" of the fire cluster
        let terms = expander.expand("burning building");
        assert!(terms.contains("fire"));
        assert!(terms.contains("smoke"));
    }

    #[test]
    fn test_unrelated_token_expands_to_itself() {
        let expander = SynonymExpander::new();
        let terms = expander.expand("zebra");
        assert_eq!(terms.len(), 1);
        assert!(terms.contains("zebra"));
    }

    #[test]
    fn test_short_tokens_do_not_fuzzy_match() {
        let expander = SynonymExpander::new();
        // "ma" is a substring of "mass" but too short for fuzzy matching
        let terms = expander.expand("ma");
        assert_eq!(terms.len(), 1);
    }
}
