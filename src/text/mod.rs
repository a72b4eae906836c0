pub mod abbreviations;
pub mod normalizer;

use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

pub use abbreviations::{AbbreviationTable, DEFAULT_ABBREVIATIONS};
pub use normalizer::{basic_normalize, TextNormalizer};

lazy_static! {
    static ref STOP_WORDS: HashSet<&'static str> = [
        "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
        "been", "before", "but", "by", "can", "did", "do", "does", "for", "from", "had", "has",
        "have", "he", "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "may",
        "me", "more", "most", "my", "no", "not", "of", "on", "or", "other", "our", "she", "so",
        "some", "such", "than", "that", "the", "their", "them", "then", "there", "these",
        "they", "this", "those", "to", "under", "up", "very", "was", "we", "were", "what",
        "when", "which", "while", "who", "will", "with", "would", "you", "your",
    ]
    .into_iter()
    .collect();
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Stem every whitespace-separated token of normalized text.
pub fn stem_tokens(normalized: &str) -> Vec<String> {
    let stemmer = Stemmer::create(Algorithm::English);
    normalized
        .split_whitespace()
        .map(|token| stemmer.stem(token).into_owned())
        .collect()
}
