use std::cmp::Ordering;

use super::entity::EntityMatch;
use super::keyword::KeywordMatch;
use super::types::{CandidateScore, ConfidenceTier};
use crate::catalog::Catalog;
use crate::config::{ScoringPolicy, Weights};

/// Weighted sum of the three signals. Monotone in each sub-score because
/// validated weights are non-negative.
pub fn aggregate_score(weights: &Weights, keyword: f64, lexical: f64, entity: f64) -> f64 {
    let score = weights.keyword_weight * keyword
        + weights.lexical_weight * lexical
        + weights.entity_weight * entity;
    score.clamp(0.0, 1.0)
}

pub fn confidence_tier(policy: &ScoringPolicy, aggregate: f64) -> ConfidenceTier {
    if aggregate >= policy.high_threshold {
        ConfidenceTier::High
    } else if aggregate >= policy.medium_threshold {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}

/// Combine per-entry signals into candidates, in catalog order.
pub fn merge_signals(
    catalog: &Catalog,
    keyword_matches: Vec<KeywordMatch>,
    lexical_scores: &[f64],
    entity_matches: Vec<EntityMatch>,
    weights: &Weights,
) -> Vec<CandidateScore> {
    catalog
        .iter()
        .zip(keyword_matches)
        .zip(lexical_scores)
        .zip(entity_matches)
        .map(|(((entry, keyword), &lexical), entity)| {
            let mut candidate = CandidateScore::new(entry.code());
            candidate.keyword_score = keyword.score;
            candidate.lexical_score = lexical;
            candidate.entity_score = entity.score;
            candidate.aggregate_score =
                aggregate_score(weights, keyword.score, lexical, entity.score);
            for term in keyword.matched.iter().chain(entity.matched.iter()) {
                candidate.add_term(term);
            }
            candidate
        })
        .collect()
}

/// Higher aggregate first, then higher keyword score, then code order.
pub fn compare_candidates(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    b.aggregate_score
        .total_cmp(&a.aggregate_score)
        .then_with(|| b.keyword_score.total_cmp(&a.keyword_score))
        .then_with(|| a.code.cmp(&b.code))
}

/// Drop zero-evidence candidates, sort and keep the best `top_k`.
pub fn rank_candidates(mut candidates: Vec<CandidateScore>, top_k: usize) -> Vec<CandidateScore> {
    candidates.retain(|candidate| candidate.aggregate_score > 0.0);
    candidates.sort_by(compare_candidates);
    candidates.truncate(top_k);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(code: &str, keyword: f64, aggregate: f64) -> CandidateScore {
        CandidateScore {
            code: code.to_string(),
            keyword_score: keyword,
            aggregate_score: aggregate,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_weighting() {
        let weights = Weights::default();
        let score = aggregate_score(&weights, 0.5, 0.2, 0.4);
        assert!((score - (0.4 * 0.5 + 0.35 * 0.2 + 0.25 * 0.4)).abs() < 1e-12);
        assert_eq!(aggregate_score(&weights, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_monotone_in_each_signal() {
        let weights = Weights::default();
        let base = aggregate_score(&weights, 0.2, 0.2, 0.2);
        assert!(aggregate_score(&weights, 0.3, 0.2, 0.2) > base);
        assert!(aggregate_score(&weights, 0.2, 0.3, 0.2) > base);
        assert!(aggregate_score(&weights, 0.2, 0.2, 0.3) > base);
    }

    #[test]
    fn test_tier_boundaries() {
        let policy = ScoringPolicy::default();
        assert_eq!(confidence_tier(&policy, 0.3), ConfidenceTier::High);
        assert_eq!(confidence_tier(&policy, 0.2999), ConfidenceTier::Medium);
        assert_eq!(confidence_tier(&policy, 0.15), ConfidenceTier::Medium);
        assert_eq!(confidence_tier(&policy, 0.1499), ConfidenceTier::Low);

        let strict = policy.with_thresholds(0.8, 0.5);
        assert_eq!(confidence_tier(&strict, 0.6), ConfidenceTier::Medium);
    }

    #[test]
    fn test_ranking_and_tie_breaks() {
        let ranked = rank_candidates(
            vec![
                candidate("B", 0.1, 0.4),
                candidate("Z", 0.0, 0.0),
                candidate("C", 0.2, 0.4),
                candidate("A", 0.1, 0.4),
                candidate("D", 0.9, 0.7),
            ],
            10,
        );
        let codes: Vec<&str> = ranked.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["D", "C", "A", "B"]);
    }

    #[test]
    fn test_truncation() {
        let candidates = (0..5)
            .map(|i| candidate(&format!("C{}", i), 0.0, 0.1 * (i + 1) as f64))
            .collect();
        let ranked = rank_candidates(candidates, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].code, "C4");
    }
}
