use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use super::abbreviations::AbbreviationTable;
use crate::TARGET_SCORING;

/// Canonical form shared by query text, catalog keywords and entity text.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    abbreviations: AbbreviationTable,
}

impl TextNormalizer {
    pub fn new(abbreviations: AbbreviationTable) -> Self {
        Self { abbreviations }
    }

    pub fn abbreviations(&self) -> &AbbreviationTable {
        &self.abbreviations
    }

    /// Case-fold, turn punctuation into single spaces and expand known
    /// abbreviations. Empty input yields an empty string.
    pub fn normalize(&self, text: &str) -> String {
        let basic = basic_normalize(text);
        if basic.is_empty() {
            return basic;
        }

        let expanded = self.abbreviations.expand(&basic);
        if expanded != basic {
            debug!(
                target: TARGET_SCORING,
                "Expanded abbreviations: '{}' -> '{}'", basic, expanded
            );
        }
        expanded
    }
}

/// Unicode decomposition, lowercase, possessive stripping, punctuation to
/// spaces and whitespace collapsing. No abbreviation handling.
pub fn basic_normalize(text: &str) -> String {
    let without_apostrophes = text
        .replace("'s ", " ")
        .replace("'s", "")
        .replace("s' ", "s ")
        .replace('\'', "");

    without_apostrophes
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric(), " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// NFKD splits accented letters into base + combining mark; drop the marks so
// "Sjögren" and "Sjogren" normalize alike.
fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036f}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_normalization() {
        assert_eq!(basic_normalize("Chest-Pain"), "chest pain");
        assert_eq!(basic_normalize("  BP: 160/95 mmHg. "), "bp 160 95 mmhg");
        assert_eq!(basic_normalize("Patient's  history\tof\nasthma"), "patient history of asthma");
        assert_eq!(basic_normalize("Sjögren syndrome"), "sjogren syndrome");
    }

    #[test]
    fn test_empty_input() {
        let normalizer = TextNormalizer::default();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   \t "), "");
        assert_eq!(normalizer.normalize("!!! ..."), "");
    }

    #[test]
    fn test_abbreviations_expanded() {
        let normalizer = TextNormalizer::default();
        let normalized = normalizer.normalize("Patient has HTN and DM");
        assert!(normalized.contains("hypertension"));
        assert!(normalized.contains("diabetes"));
        assert_eq!(normalized, "patient has hypertension and diabetes mellitus");
    }

    #[test]
    fn test_messy_text() {
        let normalizer = TextNormalizer::default();
        let normalized = normalizer.normalize("  Patient has   HTN and  DM  with   CAD  ");
        assert_eq!(normalized, normalized.to_lowercase());
        assert!(!normalized.contains("  "));
        assert!(normalized.contains("coronary artery disease"));
    }

    #[test]
    fn test_punctuation_around_abbreviations() {
        let normalizer = TextNormalizer::default();
        assert_eq!(
            normalizer.normalize("Pt w/ CAD, CHF."),
            "pt w coronary artery disease congestive heart failure"
        );
    }
}
