pub mod aggregate;
pub mod entity;
pub mod keyword;
pub mod lexical;
pub mod types;

pub use aggregate::{aggregate_score, confidence_tier, rank_candidates};
pub use entity::score_entities;
pub use keyword::KeywordMatcher;
pub use lexical::LexicalIndex;
pub use types::{CandidateScore, ConfidenceTier, Recommendation};
