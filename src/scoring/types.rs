use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::Specialty;

/// Coarse confidence bucket derived from the aggregate score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceTier::High => write!(f, "High"),
            ConfidenceTier::Medium => write!(f, "Medium"),
            ConfidenceTier::Low => write!(f, "Low"),
        }
    }
}

/// Per-request, per-entry evidence gathered by the three scorers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateScore {
    pub code: String,
    pub keyword_score: f64,
    pub lexical_score: f64,
    pub entity_score: f64,
    pub aggregate_score: f64,

    // Catalog keywords that fired, keyword matches first then entity matches
    pub matched_terms: Vec<String>,
}

impl CandidateScore {
    pub fn new(code: &str) -> Self {
        CandidateScore {
            code: code.to_string(),
            ..Default::default()
        }
    }

    /// Record a matched keyword, ignoring repeats
    pub fn add_term(&mut self, term: &str) {
        if !self.matched_terms.iter().any(|existing| existing == term) {
            self.matched_terms.push(term.to_string());
        }
    }
}

/// One ranked code suggestion returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub icd_code: String,
    pub description: String,
    pub specialty: Specialty,
    pub confidence_score: f64,
    pub confidence_tier: ConfidenceTier,
    pub matched_keywords: Vec<String>,
}
