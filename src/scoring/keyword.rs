use crate::catalog::Catalog;
use crate::text::{basic_normalize, stem_tokens, TextNormalizer};

/// A catalog keyword prepared for word-level comparison
#[derive(Debug, Clone)]
pub struct KeywordPattern {
    /// Spelling as declared in the catalog, reported back as evidence
    pub literal: String,
    pub stems: Vec<String>,
}

impl KeywordPattern {
    /// True when the keyword occurs as a run of whole words in `text_stems`.
    pub fn occurs_in(&self, text_stems: &[String]) -> bool {
        !self.stems.is_empty()
            && text_stems
                .windows(self.stems.len())
                .any(|window| window == self.stems.as_slice())
    }

    pub fn equals(&self, stems: &[String]) -> bool {
        !self.stems.is_empty() && self.stems == stems
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordMatch {
    pub score: f64,
    pub matched: Vec<String>,
}

/// Keyword patterns for every catalog entry, in catalog order
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    patterns: Vec<Vec<KeywordPattern>>,
}

impl KeywordMatcher {
    /// One pattern per distinct phrase of each entry. An abbreviation and its
    /// expansion normalize to the same stems, so they collapse into a single
    /// pattern reported under the expanded spelling.
    pub fn new(catalog: &Catalog, normalizer: &TextNormalizer) -> Self {
        let patterns = catalog
            .iter()
            .map(|entry| distinct_patterns(entry.keywords(), normalizer))
            .collect();

        Self { patterns }
    }

    /// Patterns of the entry at `position` in the catalog
    pub fn patterns(&self, position: usize) -> &[KeywordPattern] {
        self.patterns
            .get(position)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Fraction of each entry's keywords found in the stemmed query.
    pub fn score(&self, text_stems: &[String]) -> Vec<KeywordMatch> {
        self.patterns
            .iter()
            .map(|patterns| {
                let matched: Vec<String> = patterns
                    .iter()
                    .filter(|pattern| pattern.occurs_in(text_stems))
                    .map(|pattern| pattern.literal.clone())
                    .collect();
                let score = matched.len() as f64 / patterns.len().max(1) as f64;
                KeywordMatch { score, matched }
            })
            .collect()
    }
}

fn distinct_patterns(keywords: &[String], normalizer: &TextNormalizer) -> Vec<KeywordPattern> {
    let mut patterns: Vec<KeywordPattern> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let normalized = normalizer.normalize(keyword);
        let stems = stem_tokens(&normalized);
        let spelled_out = basic_normalize(keyword) == normalized;

        match patterns.iter_mut().find(|pattern| pattern.stems == stems) {
            // Prefer a spelling that can actually occur in normalized text
            Some(existing) => {
                let existing_spelled_out =
                    basic_normalize(&existing.literal) == normalizer.normalize(&existing.literal);
                if spelled_out && !existing_spelled_out {
                    existing.literal = keyword.clone();
                }
            }
            None => patterns.push(KeywordPattern {
                literal: keyword.clone(),
                stems,
            }),
        }
    }
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CodeRecord, Specialty};

    fn matcher() -> (Catalog, KeywordMatcher, TextNormalizer) {
        let catalog = Catalog::from_records(vec![
            CodeRecord::new(
                "I10",
                "Essential (primary) hypertension",
                Specialty::Cardiovascular,
                &["hypertension", "high blood pressure", "HTN", "primary hypertension"],
            ),
            CodeRecord::new(
                "Z00",
                "Examination of man",
                Specialty::Other("General".to_string()),
                &["man"],
            ),
        ])
        .unwrap();
        let normalizer = TextNormalizer::default();
        let matcher = KeywordMatcher::new(&catalog, &normalizer);
        (catalog, matcher, normalizer)
    }

    fn stems(normalizer: &TextNormalizer, text: &str) -> Vec<String> {
        stem_tokens(&normalizer.normalize(text))
    }

    #[test]
    fn test_fraction_of_keywords() {
        let (_, matcher, normalizer) = matcher();
        let matches = matcher.score(&stems(&normalizer, "History of high blood pressure"));
        assert_eq!(matches[0].matched, vec!["high blood pressure"]);
        // "HTN" and "hypertension" are one phrase, leaving three distinct keywords
        assert!((matches[0].score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_abbreviation_and_expansion_count_once() {
        let (_, matcher, normalizer) = matcher();
        assert_eq!(matcher.patterns(0).len(), 3);

        let matches = matcher.score(&stems(&normalizer, "Known HTN"));
        assert_eq!(matches[0].matched, vec!["hypertension"]);

        let matches = matcher.score(&stems(&normalizer, "hypertension"));
        assert_eq!(matches[0].matched, vec!["hypertension"]);
        assert!((matches[0].score - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_expanded_spelling_reported_when_abbreviation_comes_first() {
        let catalog = Catalog::from_records(vec![CodeRecord::new(
            "J44.1",
            "Chronic obstructive pulmonary disease with acute exacerbation",
            Specialty::Respiratory,
            &["COPD", "chronic obstructive pulmonary disease", "emphysema"],
        )])
        .unwrap();
        let normalizer = TextNormalizer::default();
        let matcher = KeywordMatcher::new(&catalog, &normalizer);

        let matches = matcher.score(&stems(&normalizer, "copd exacerbation"));
        assert_eq!(matches[0].matched, vec!["chronic obstructive pulmonary disease"]);
        assert!((matches[0].score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_word_boundaries() {
        let (_, matcher, normalizer) = matcher();
        let matches = matcher.score(&stems(&normalizer, "A woman with headaches"));
        assert_eq!(matches[1].score, 0.0);
        assert!(matches[1].matched.is_empty());

        let matches = matcher.score(&stems(&normalizer, "The man with headaches"));
        assert_eq!(matches[1].score, 1.0);
    }

    #[test]
    fn test_stemmed_overlap() {
        let (_, matcher, normalizer) = matcher();
        let matches = matcher.score(&stems(&normalizer, "blood pressures remain high"));
        assert!(matches[0].matched.is_empty());
        let matches = matcher.score(&stems(&normalizer, "high blood pressures"));
        assert_eq!(matches[0].matched, vec!["high blood pressure"]);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        let (catalog, matcher, _) = matcher();
        let matches = matcher.score(&[]);
        assert_eq!(matches.len(), catalog.len());
        assert!(matches.iter().all(|m| m.score == 0.0));
    }
}
