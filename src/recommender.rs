//! Code recommendation engine
//!
//! `IcdRecommender` owns the catalog and everything fitted from it (keyword
//! patterns, the lexical vector space). All of it is built in the
//! constructor and read-only afterwards, so one engine can serve concurrent
//! requests and parallel batches without locking.

use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::catalog::{Catalog, CodeEntry, Specialty};
use crate::config::{ScoringPolicy, Weights};
use crate::entity::ExtractedEntity;
use crate::error::{RecommendError, RecommendResult};
use crate::scoring::aggregate::{confidence_tier, merge_signals, rank_candidates};
use crate::scoring::{
    score_entities, CandidateScore, KeywordMatcher, LexicalIndex, Recommendation,
};
use crate::text::{basic_normalize, stem_tokens, TextNormalizer};
use crate::TARGET_SCORING;

#[derive(Debug, Clone)]
pub struct IcdRecommender {
    catalog: Catalog,
    normalizer: TextNormalizer,
    keywords: KeywordMatcher,
    lexical: LexicalIndex,
    policy: ScoringPolicy,
}

impl IcdRecommender {
    pub fn new(
        catalog: Catalog,
        normalizer: TextNormalizer,
        policy: ScoringPolicy,
    ) -> RecommendResult<Self> {
        policy.validate()?;

        let keywords = KeywordMatcher::new(&catalog, &normalizer);
        let lexical = LexicalIndex::fit(&catalog, &normalizer);

        info!(
            target: TARGET_SCORING,
            "Recommender ready: {} codes, {} lexical terms",
            catalog.len(),
            lexical.vocabulary_len()
        );

        Ok(IcdRecommender {
            catalog,
            normalizer,
            keywords,
            lexical,
            policy,
        })
    }

    /// Built-in catalog, default abbreviations and default policy
    pub fn builtin() -> RecommendResult<Self> {
        Self::new(
            Catalog::builtin()?,
            TextNormalizer::default(),
            ScoringPolicy::default(),
        )
    }

    pub fn with_catalog(catalog: Catalog) -> RecommendResult<Self> {
        Self::new(catalog, TextNormalizer::default(), ScoringPolicy::default())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Rank catalog codes for `diagnosis_text`.
    ///
    /// `entities` come from an external extractor; `weights` override the
    /// engine policy for this call only. Blank text yields no
    /// recommendations. Arguments are validated before anything is scored.
    pub fn recommend_codes(
        &self,
        diagnosis_text: &str,
        entities: Option<&[ExtractedEntity]>,
        top_k: usize,
        weights: Option<Weights>,
    ) -> RecommendResult<Vec<Recommendation>> {
        let ranked = self.ranked_candidates(diagnosis_text, entities, top_k, weights)?;
        Ok(ranked
            .into_iter()
            .filter_map(|candidate| self.to_recommendation(candidate))
            .collect())
    }

    /// Same as [`recommend_codes`](Self::recommend_codes) but returns the
    /// per-signal breakdown of each ranked candidate.
    pub fn explain(
        &self,
        diagnosis_text: &str,
        entities: Option<&[ExtractedEntity]>,
        top_k: usize,
        weights: Option<Weights>,
    ) -> RecommendResult<Vec<CandidateScore>> {
        self.ranked_candidates(diagnosis_text, entities, top_k, weights)
    }

    /// Independent recommendations for each text, in input order. Items are
    /// scored in parallel.
    pub fn recommend_codes_batch<S>(
        &self,
        diagnosis_texts: &[S],
        top_k: usize,
    ) -> RecommendResult<Vec<Vec<Recommendation>>>
    where
        S: AsRef<str> + Sync,
    {
        validate_top_k(top_k)?;

        let results = diagnosis_texts
            .par_iter()
            .map(|text| self.recommend_codes(text.as_ref(), None, top_k, None))
            .collect::<RecommendResult<Vec<_>>>()?;

        info!(
            target: TARGET_SCORING,
            "Scored batch of {} diagnosis texts", diagnosis_texts.len()
        );

        Ok(results)
    }

    pub fn get_code_details(&self, code: &str) -> Option<&CodeEntry> {
        self.catalog.get(code.trim())
    }

    /// Entries whose description or keywords contain `keyword`, in catalog order.
    pub fn search_by_keyword(&self, keyword: &str, max_results: usize) -> Vec<&CodeEntry> {
        let needle = basic_normalize(keyword);
        if needle.is_empty() {
            return Vec::new();
        }

        self.catalog
            .iter()
            .filter(|entry| {
                basic_normalize(entry.description()).contains(&needle)
                    || entry
                        .keywords()
                        .iter()
                        .any(|k| basic_normalize(k).contains(&needle))
            })
            .take(max_results)
            .collect()
    }

    /// Mean aggregate score per specialty over the whole catalog, highest first.
    pub fn category_distribution(&self, diagnosis_text: &str) -> RecommendResult<Vec<(Specialty, f64)>> {
        let candidates = self.score_all(diagnosis_text, None, &self.policy.weights)?;
        if candidates.iter().all(|c| c.aggregate_score == 0.0) {
            return Ok(Vec::new());
        }

        let mut totals: BTreeMap<&Specialty, (f64, usize)> = BTreeMap::new();
        for (entry, candidate) in self.catalog.iter().zip(&candidates) {
            let total = totals.entry(entry.specialty()).or_insert((0.0, 0));
            total.0 += candidate.aggregate_score;
            total.1 += 1;
        }

        let mut distribution: Vec<(Specialty, f64)> = totals
            .into_iter()
            .map(|(specialty, (sum, count))| (specialty.clone(), sum / count as f64))
            .collect();
        distribution.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
        });

        Ok(distribution)
    }

    fn ranked_candidates(
        &self,
        diagnosis_text: &str,
        entities: Option<&[ExtractedEntity]>,
        top_k: usize,
        weights: Option<Weights>,
    ) -> RecommendResult<Vec<CandidateScore>> {
        validate_top_k(top_k)?;
        let weights = match weights {
            Some(weights) => {
                weights.validate()?;
                weights
            }
            None => self.policy.weights,
        };

        let candidates = self.score_all(diagnosis_text, entities, &weights)?;
        let ranked = rank_candidates(candidates, top_k);

        if let Some(best) = ranked.first() {
            debug!(
                target: TARGET_SCORING,
                "Top candidate {} (aggregate {:.3}, keyword {:.3}, lexical {:.3}, entity {:.3}) of {} ranked",
                best.code,
                best.aggregate_score,
                best.keyword_score,
                best.lexical_score,
                best.entity_score,
                ranked.len()
            );
        }

        Ok(ranked)
    }

    // One candidate per catalog entry, in catalog order. Blank text scores
    // nothing at all.
    fn score_all(
        &self,
        diagnosis_text: &str,
        entities: Option<&[ExtractedEntity]>,
        weights: &Weights,
    ) -> RecommendResult<Vec<CandidateScore>> {
        let entities = entities.unwrap_or(&[]);
        validate_entities(entities)?;

        let normalized = self.normalizer.normalize(diagnosis_text);
        if normalized.is_empty() {
            debug!(target: TARGET_SCORING, "Blank diagnosis text, nothing to score");
            return Ok(Vec::new());
        }

        let stems = stem_tokens(&normalized);
        let keyword_matches = self.keywords.score(&stems);
        let lexical_scores = self.lexical.similarities(&normalized);
        let entity_matches = score_entities(&self.keywords, &self.normalizer, entities);

        debug!(
            target: TARGET_SCORING,
            "Scoring '{}' against {} codes with {} entities",
            normalized,
            self.catalog.len(),
            entities.len()
        );

        Ok(merge_signals(
            &self.catalog,
            keyword_matches,
            &lexical_scores,
            entity_matches,
            weights,
        ))
    }

    fn to_recommendation(&self, candidate: CandidateScore) -> Option<Recommendation> {
        let entry = self.catalog.get(&candidate.code)?;
        Some(Recommendation {
            icd_code: candidate.code,
            description: entry.description().to_string(),
            specialty: entry.specialty().clone(),
            confidence_score: candidate.aggregate_score,
            confidence_tier: confidence_tier(&self.policy, candidate.aggregate_score),
            matched_keywords: candidate.matched_terms,
        })
    }
}

fn validate_top_k(top_k: usize) -> RecommendResult<()> {
    if top_k == 0 {
        return Err(RecommendError::InvalidArgument(
            "top_k must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

fn validate_entities(entities: &[ExtractedEntity]) -> RecommendResult<()> {
    for (position, entity) in entities.iter().enumerate() {
        if !entity.has_valid_confidence() {
            return Err(RecommendError::InvalidArgument(format!(
                "entity {} ('{}') has confidence {} outside [0, 1]",
                position, entity.text, entity.confidence
            )));
        }
    }
    Ok(())
}
