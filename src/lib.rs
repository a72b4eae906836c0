pub mod catalog;
pub mod config;
pub mod entity;
pub mod environment;
pub mod error;
pub mod llm;
pub mod logging;
pub mod recommender;
pub mod scoring;
pub mod text;

pub const TARGET_CATALOG: &str = "catalog";
pub const TARGET_SCORING: &str = "scoring";
pub const TARGET_ENTITY: &str = "entity";
pub const TARGET_LLM_REQUEST: &str = "llm_request";

pub use catalog::{Catalog, CodeEntry, CodeRecord, Specialty};
pub use config::{ScoringPolicy, Weights, DEFAULT_TOP_K};
pub use entity::{EntityExtractor, EntityLabel, ExtractedEntity};
pub use error::{CatalogLoadError, ExtractionError, RecommendError, RecommendResult};
pub use recommender::IcdRecommender;
pub use scoring::{CandidateScore, ConfidenceTier, Recommendation};
