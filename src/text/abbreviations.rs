use std::collections::HashMap;

use super::normalizer::basic_normalize;

/// Clinical shorthand and its expansion. Keys may span several words; the
/// table always prefers the longest key that matches at a given position.
pub const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("htn", "hypertension"),
    ("dm", "diabetes mellitus"),
    ("dm 1", "type 1 diabetes mellitus"),
    ("dm i", "type 1 diabetes mellitus"),
    ("dm 2", "type 2 diabetes mellitus"),
    ("dm ii", "type 2 diabetes mellitus"),
    ("t1dm", "type 1 diabetes mellitus"),
    ("t2dm", "type 2 diabetes mellitus"),
    ("cad", "coronary artery disease"),
    ("chf", "congestive heart failure"),
    ("copd", "chronic obstructive pulmonary disease"),
    ("gerd", "gastroesophageal reflux disease"),
    ("mi", "myocardial infarction"),
    ("cvd", "cardiovascular disease"),
    ("ckd", "chronic kidney disease"),
    ("uti", "urinary tract infection"),
    ("dvt", "deep vein thrombosis"),
    ("pe", "pulmonary embolism"),
    ("hld", "hyperlipidemia"),
    ("mdd", "major depressive disorder"),
    ("gad", "generalized anxiety disorder"),
    ("sob", "shortness of breath"),
];

#[derive(Debug, Clone)]
struct Abbreviation {
    tokens: Vec<String>,
    expansion: String,
}

/// Immutable abbreviation lookup, built once and handed to the normalizer.
#[derive(Debug, Clone)]
pub struct AbbreviationTable {
    // Keyed by first token; each bucket is sorted longest key first.
    by_first_token: HashMap<String, Vec<Abbreviation>>,
}

impl AbbreviationTable {
    pub fn new<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut by_first_token: HashMap<String, Vec<Abbreviation>> = HashMap::new();

        for (abbreviation, expansion) in pairs {
            let key = basic_normalize(abbreviation);
            let tokens: Vec<String> = key.split_whitespace().map(str::to_string).collect();
            let Some(first) = tokens.first().cloned() else {
                continue;
            };
            let bucket = by_first_token.entry(first).or_default();
            // Later definitions of the same key replace earlier ones.
            bucket.retain(|existing| existing.tokens != tokens);
            bucket.push(Abbreviation {
                tokens,
                expansion: basic_normalize(expansion),
            });
        }

        for bucket in by_first_token.values_mut() {
            bucket.sort_by(|a, b| {
                b.tokens
                    .len()
                    .cmp(&a.tokens.len())
                    .then_with(|| b.tokens.join(" ").len().cmp(&a.tokens.join(" ").len()))
                    .then_with(|| a.tokens.cmp(&b.tokens))
            });
        }

        Self { by_first_token }
    }

    pub fn len(&self) -> usize {
        self.by_first_token.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_first_token.is_empty()
    }

    /// Expand whole-word abbreviations in already case-folded, space-separated
    /// text. Expansions are emitted verbatim and never re-expanded.
    pub fn expand(&self, normalized: &str) -> String {
        let tokens: Vec<&str> = normalized.split_whitespace().collect();
        let mut output: Vec<&str> = Vec::with_capacity(tokens.len());
        let mut position = 0;

        while position < tokens.len() {
            let matched = self
                .by_first_token
                .get(tokens[position])
                .and_then(|bucket| {
                    bucket.iter().find(|abbreviation| {
                        let end = position + abbreviation.tokens.len();
                        end <= tokens.len()
                            && abbreviation
                                .tokens
                                .iter()
                                .zip(&tokens[position..end])
                                .all(|(expected, actual)| expected == actual)
                    })
                });

            match matched {
                Some(abbreviation) => {
                    output.push(&abbreviation.expansion);
                    position += abbreviation.tokens.len();
                }
                None => {
                    output.push(tokens[position]);
                    position += 1;
                }
            }
        }

        output.join(" ")
    }
}

impl Default for AbbreviationTable {
    fn default() -> Self {
        Self::new(DEFAULT_ABBREVIATIONS.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_token_expansion() {
        let table = AbbreviationTable::default();
        assert_eq!(
            table.expand("history of htn and copd"),
            "history of hypertension and chronic obstructive pulmonary disease"
        );
    }

    #[test]
    fn test_longest_key_wins() {
        let table = AbbreviationTable::default();
        assert_eq!(table.expand("dm 2 on metformin"), "type 2 diabetes mellitus on metformin");
        assert_eq!(table.expand("dm controlled"), "diabetes mellitus controlled");
    }

    #[test]
    fn test_whole_words_only() {
        let table = AbbreviationTable::default();
        // "mi" inside "mild" and "pe" inside "pelvic" must stay untouched
        assert_eq!(table.expand("mild pelvic discomfort"), "mild pelvic discomfort");
    }

    #[test]
    fn test_custom_table_overrides() {
        let table = AbbreviationTable::new([("ra", "rheumatoid arthritis"), ("RA", "right atrium")]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.expand("dilated ra"), "dilated right atrium");
    }
}
