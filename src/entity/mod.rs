pub mod model;
pub mod rules;
pub mod types;

use std::collections::BTreeMap;
use tracing::{info, warn};

pub use model::ModelEntityExtractor;
pub use rules::RuleBasedExtractor;
pub use types::*;

use crate::error::ExtractionError;
use crate::llm::LlmParams;

pub use crate::TARGET_ENTITY;

/// Default minimum confidence for extracted entities
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;
/// Lower bar used when entities feed code recommendation
pub const DIAGNOSIS_CONFIDENCE_THRESHOLD: f64 = 0.3;

/// Entity extraction capability, chosen by the caller. The scoring core never
/// calls this itself; it only consumes the entities it returns.
#[derive(Debug, Clone)]
pub enum EntityExtractor {
    /// LLM-backed extraction that falls back to rules when the model fails
    Model {
        model: ModelEntityExtractor,
        fallback: RuleBasedExtractor,
    },
    Rules(RuleBasedExtractor),
}

impl EntityExtractor {
    pub fn rules() -> Result<Self, ExtractionError> {
        Ok(EntityExtractor::Rules(RuleBasedExtractor::new()?))
    }

    pub fn model(params: LlmParams) -> Result<Self, ExtractionError> {
        Ok(EntityExtractor::Model {
            model: ModelEntityExtractor::new(params),
            fallback: RuleBasedExtractor::new()?,
        })
    }

    /// Entities at or above `confidence_threshold`. Never fails: model
    /// errors degrade to rule-based extraction.
    pub async fn extract(&self, text: &str, confidence_threshold: f64) -> Vec<ExtractedEntity> {
        let entities = match self {
            EntityExtractor::Rules(rules) => rules.extract(text),
            EntityExtractor::Model { model, fallback } => match model.extract(text).await {
                Ok(entities) => entities,
                Err(e) => {
                    warn!(
                        target: TARGET_ENTITY,
                        "Model {} unavailable ({}), falling back to pattern matching",
                        model.model(),
                        e
                    );
                    fallback.extract(text)
                }
            },
        };

        entities
            .into_iter()
            .filter(|entity| entity.confidence >= confidence_threshold)
            .collect()
    }

    /// Diagnostic entities (diseases, symptoms, medications) for scoring
    pub async fn extract_diagnostic(&self, text: &str) -> Vec<ExtractedEntity> {
        self.extract(text, DIAGNOSIS_CONFIDENCE_THRESHOLD)
            .await
            .into_iter()
            .filter(|entity| entity.label.is_diagnostic())
            .collect()
    }

    pub async fn extract_by_category(
        &self,
        text: &str,
        label: Option<EntityLabel>,
    ) -> BTreeMap<EntityLabel, Vec<String>> {
        let entities = self.extract(text, DEFAULT_CONFIDENCE_THRESHOLD).await;
        group_by_label(&entities, label)
    }

    pub async fn summarize(&self, text: &str) -> EntitySummary {
        let entities = self.extract(text, DEFAULT_CONFIDENCE_THRESHOLD).await;
        EntitySummary::from_entities(&entities)
    }

    pub async fn extract_batch(&self, texts: &[String]) -> Vec<Vec<ExtractedEntity>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.extract(text, DEFAULT_CONFIDENCE_THRESHOLD).await);
        }
        info!(target: TARGET_ENTITY, "Extracted entities for {} texts", texts.len());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ollama_rs::Ollama;
    use std::time::Duration;

    #[tokio::test]
    async fn test_rules_extractor() {
        let extractor = EntityExtractor::rules().unwrap();
        let entities = extractor
            .extract("Chest pain and fever, on aspirin", DEFAULT_CONFIDENCE_THRESHOLD)
            .await;
        let texts: Vec<&str> = entities.iter().map(|e| e.text.as_str()).collect();
        assert!(texts.contains(&"Chest pain"));
        assert!(texts.contains(&"fever"));
        assert!(texts.contains(&"aspirin"));

        assert!(extractor.extract("Chest pain", 0.9).await.is_empty());
    }

    #[tokio::test]
    async fn test_diagnostic_filter() {
        let extractor = EntityExtractor::rules().unwrap();
        let entities = extractor.extract_diagnostic("pain in the neck").await;
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].label, EntityLabel::Symptom);
    }

    #[tokio::test]
    async fn test_model_failure_falls_back_to_rules() {
        // Nothing listens on the discard port
        let mut params = LlmParams::new(Ollama::new("http://127.0.0.1".to_string(), 9), "none");
        params.max_retries = 1;
        params.request_timeout = Duration::from_secs(2);

        let extractor = EntityExtractor::model(params).unwrap();
        let entities = extractor
            .extract("History of asthma", DEFAULT_CONFIDENCE_THRESHOLD)
            .await;
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "asthma");
        assert_eq!(entities[0].label, EntityLabel::Disease);
    }

    #[tokio::test]
    async fn test_category_and_summary() {
        let extractor = EntityExtractor::rules().unwrap();
        let text = "Headache and nausea. Headache again, took ibuprofen.";

        let categories = extractor.extract_by_category(text, None).await;
        assert_eq!(categories[&EntityLabel::Symptom], vec!["Headache", "nausea"]);

        let medications = extractor
            .extract_by_category(text, Some(EntityLabel::Medication))
            .await;
        assert_eq!(medications.keys().collect::<Vec<_>>(), vec![&EntityLabel::Medication]);

        let summary = extractor.summarize(text).await;
        assert_eq!(summary.total_entities, 4);
        assert_eq!(summary.unique_entities, 3);

        let batch = extractor
            .extract_batch(&[text.to_string(), String::new()])
            .await;
        assert_eq!(batch.len(), 2);
        assert!(batch[1].is_empty());
    }
}
