use crate::entity::ExtractedEntity;
use crate::text::{stem_tokens, TextNormalizer};

use super::keyword::KeywordMatcher;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMatch {
    pub score: f64,
    pub matched: Vec<String>,
}

/// Score catalog entries by externally extracted entities.
///
/// An entity supports an entry when its normalized text equals one of the
/// entry's keywords. Support is weighted by the entity's own confidence and
/// summed per entry, capped at 1.0. Each entity counts at most once per entry.
/// With no entities every entry scores 0.
pub fn score_entities(
    matcher: &KeywordMatcher,
    normalizer: &TextNormalizer,
    entities: &[ExtractedEntity],
) -> Vec<EntityMatch> {
    let mut matches = vec![EntityMatch::default(); matcher.len()];
    if entities.is_empty() {
        return matches;
    }

    let prepared: Vec<(Vec<String>, f64)> = entities
        .iter()
        .map(|entity| {
            (
                stem_tokens(&normalizer.normalize(&entity.text)),
                entity.confidence,
            )
        })
        .filter(|(stems, _)| !stems.is_empty())
        .collect();

    for (position, entry_match) in matches.iter_mut().enumerate() {
        let patterns = matcher.patterns(position);
        for (stems, confidence) in &prepared {
            let mut supported = false;
            for pattern in patterns.iter().filter(|pattern| pattern.equals(stems)) {
                supported = true;
                if !entry_match.matched.contains(&pattern.literal) {
                    entry_match.matched.push(pattern.literal.clone());
                }
            }
            if supported {
                entry_match.score += confidence;
            }
        }
        entry_match.score = entry_match.score.min(1.0);
    }

    matches
}
