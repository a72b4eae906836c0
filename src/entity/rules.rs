use regex::Regex;
use tracing::debug;

use super::types::{EntityLabel, ExtractedEntity};
use super::TARGET_ENTITY;
use crate::error::ExtractionError;

/// Confidence assigned to every pattern hit
pub const RULE_CONFIDENCE: f64 = 0.8;

const DEFAULT_PATTERNS: &[(EntityLabel, &str)] = &[
    (
        EntityLabel::Disease,
        r"(?i)\b(?:diabetes|hypertension|cancer|pneumonia|asthma|arthritis|migraine|depression|anxiety|bronchitis|hyperlipidemia|myocardial infarction|heart failure)\b",
    ),
    (
        EntityLabel::Symptom,
        r"(?i)\b(?:chest pain|shortness of breath|pain|fever|nausea|fatigue|headache|cough|wheezing|heartburn|constipation)\b",
    ),
    (
        EntityLabel::Medication,
        r"(?i)\b(?:aspirin|ibuprofen|acetaminophen|insulin|metformin|lisinopril|atorvastatin)\b",
    ),
    (
        EntityLabel::Anatomy,
        r"(?i)\b(?:heart|lung|liver|kidney|brain|stomach|chest|abdomen|head|neck)\b",
    ),
];

/// Pattern-matching extractor used when no model is available
#[derive(Debug, Clone)]
pub struct RuleBasedExtractor {
    patterns: Vec<(EntityLabel, Regex)>,
}

impl RuleBasedExtractor {
    pub fn new() -> Result<Self, ExtractionError> {
        Self::with_patterns(DEFAULT_PATTERNS.iter().copied())
    }

    pub fn with_patterns<'a, I>(patterns: I) -> Result<Self, ExtractionError>
    where
        I: IntoIterator<Item = (EntityLabel, &'a str)>,
    {
        let patterns = patterns
            .into_iter()
            .map(|(label, pattern)| Ok((label, Regex::new(pattern)?)))
            .collect::<Result<Vec<_>, ExtractionError>>()?;
        Ok(Self { patterns })
    }

    /// Every pattern hit, ordered by position then label.
    pub fn extract(&self, text: &str) -> Vec<ExtractedEntity> {
        let collapsed = collapse_whitespace(text);
        let text: &str = &collapsed;

        let mut entities: Vec<ExtractedEntity> = self
            .patterns
            .iter()
            .flat_map(move |(label, pattern)| {
                pattern.find_iter(text).map(move |found| {
                    ExtractedEntity::new(found.as_str(), *label, RULE_CONFIDENCE)
                        .with_span(found.start(), found.end())
                })
            })
            .collect();

        entities.sort_by(|a, b| a.start.cmp(&b.start).then(a.label.cmp(&b.label)));

        debug!(
            target: TARGET_ENTITY,
            "Rule-based extraction found {} entities", entities.len()
        );

        entities
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
