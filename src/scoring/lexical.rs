//! TF-IDF vector space over catalog descriptions.
//!
//! The vocabulary and inverse document frequencies are fitted once from the
//! catalog. Queries are projected onto that fixed vocabulary: terms the
//! catalog never uses carry no weight, and nothing is re-fitted per request.
//! Vectors are kept sparse and sorted by term index, so dot products are
//! always summed in the same order and repeated calls are bit-identical.

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::catalog::Catalog;
use crate::text::{is_stop_word, TextNormalizer};
use crate::TARGET_SCORING;

/// Tokens shorter than this are ignored, like single letters and digits
const MIN_TERM_LENGTH: usize = 2;

type SparseVector = Vec<(usize, f64)>;

#[derive(Debug, Clone)]
pub struct LexicalIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    documents: Vec<SparseVector>,
}

impl LexicalIndex {
    /// Fit the vector space with one document per catalog description.
    pub fn fit(catalog: &Catalog, normalizer: &TextNormalizer) -> Self {
        let corpus: Vec<Vec<String>> = catalog
            .iter()
            .map(|entry| content_terms(&normalizer.normalize(entry.description())))
            .collect();

        // Terms get indices in order of first appearance
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: Vec<usize> = Vec::new();
        for terms in &corpus {
            let mut seen_in_document = Vec::new();
            for term in terms {
                let next_index = vocabulary.len();
                let index = *vocabulary.entry(term.clone()).or_insert(next_index);
                if index == document_frequency.len() {
                    document_frequency.push(0);
                }
                if !seen_in_document.contains(&index) {
                    seen_in_document.push(index);
                    document_frequency[index] += 1;
                }
            }
        }

        // Smoothed IDF: ln((1 + n) / (1 + df)) + 1
        let document_count = corpus.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + document_count) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let mut index = LexicalIndex {
            vocabulary,
            idf,
            documents: Vec::new(),
        };
        let documents: Vec<SparseVector> = corpus.iter().map(|terms| index.weigh(terms)).collect();
        index.documents = documents;

        debug!(
            target: TARGET_SCORING,
            "Fitted lexical index: {} documents, {} terms",
            index.documents.len(),
            index.vocabulary.len()
        );

        index
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Cosine similarity in `[0, 1]` between the normalized query and each
    /// catalog description, in catalog order.
    pub fn similarities(&self, normalized_text: &str) -> Vec<f64> {
        let query = self.weigh(&content_terms(normalized_text));
        self.documents
            .iter()
            .map(|document| cosine(&query, document))
            .collect()
    }

    // Raw term counts times IDF, L2-normalized. Out-of-vocabulary terms drop out.
    fn weigh(&self, terms: &[String]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms {
            if let Some(&index) = self.vocabulary.get(term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut vector: SparseVector = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();

        let magnitude = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if magnitude > 0.0 {
            for (_, weight) in vector.iter_mut() {
                *weight /= magnitude;
            }
        }
        vector
    }
}

/// Stemmed, stop-word-free terms of normalized text
fn content_terms(normalized_text: &str) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    normalized_text
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TERM_LENGTH && !is_stop_word(token))
        .map(|token| stemmer.stem(token).into_owned())
        .collect()
}

// Both vectors are unit length (or empty) and sorted by index.
fn cosine(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut dot = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CodeRecord, Specialty};

    fn index() -> (Catalog, LexicalIndex, TextNormalizer) {
        let catalog = Catalog::from_records(vec![
            CodeRecord::new("I50.9", "Heart failure, unspecified", Specialty::Cardiovascular, &["heart failure"]),
            CodeRecord::new("J45.9", "Asthma, unspecified", Specialty::Respiratory, &["asthma"]),
            CodeRecord::new("M25.50", "Pain in unspecified joint", Specialty::Musculoskeletal, &["joint pain"]),
        ])
        .unwrap();
        let normalizer = TextNormalizer::default();
        let index = LexicalIndex::fit(&catalog, &normalizer);
        (catalog, index, normalizer)
    }

    #[test]
    fn test_vocabulary_excludes_stop_words() {
        let (_, index, _) = index();
        // heart, failur, unspecifi, asthma, pain, joint
        assert_eq!(index.vocabulary_len(), 6);
    }

    #[test]
    fn test_identical_description_scores_one() {
        let (_, index, normalizer) = index();
        let scores = index.similarities(&normalizer.normalize("Asthma, unspecified"));
        assert!((scores[1] - 1.0).abs() < 1e-9);
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_rare_terms_outweigh_common_ones() {
        let (_, index, normalizer) = index();
        let scores = index.similarities(&normalizer.normalize("failing heart"));
        assert!(scores[0] > 0.0);
        assert_eq!(scores[1], 0.0);
        assert_eq!(scores[2], 0.0);
    }

    #[test]
    fn test_unknown_terms_contribute_nothing() {
        let (catalog, index, normalizer) = index();
        let scores = index.similarities(&normalizer.normalize("troponin elevated"));
        assert_eq!(scores, vec![0.0; catalog.len()]);
        assert_eq!(index.similarities(""), vec![0.0; catalog.len()]);
    }

    #[test]
    fn test_repeatable() {
        let (_, index, normalizer) = index();
        let text = normalizer.normalize("joint pain with heart failure");
        let first = index.similarities(&text);
        let second = index.similarities(&text);
        assert_eq!(
            first.iter().map(|s| s.to_bits()).collect::<Vec<_>>(),
            second.iter().map(|s| s.to_bits()).collect::<Vec<_>>()
        );
    }
}
