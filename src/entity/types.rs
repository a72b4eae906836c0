use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Entity label enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Disease,
    Symptom,
    Medication,
    Anatomy,
    Other,
}

impl EntityLabel {
    /// Labels that carry diagnostic evidence when picking codes
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            EntityLabel::Disease | EntityLabel::Symptom | EntityLabel::Medication
        )
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityLabel::Disease => write!(f, "DISEASE"),
            EntityLabel::Symptom => write!(f, "SYMPTOM"),
            EntityLabel::Medication => write!(f, "MEDICATION"),
            EntityLabel::Anatomy => write!(f, "ANATOMY"),
            EntityLabel::Other => write!(f, "OTHER"),
        }
    }
}

impl From<&str> for EntityLabel {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "DISEASE" | "DISEASE_DISORDER" => EntityLabel::Disease,
            "SYMPTOM" | "SIGN_SYMPTOM" => EntityLabel::Symptom,
            "MEDICATION" | "DRUG" => EntityLabel::Medication,
            "ANATOMY" | "BIOLOGICAL_STRUCTURE" => EntityLabel::Anatomy,
            _ => EntityLabel::Other,
        }
    }
}

impl From<String> for EntityLabel {
    fn from(s: String) -> Self {
        EntityLabel::from(s.as_str())
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.to_string()
    }
}

/// A labeled span of clinical text produced by an extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
    pub text: String,
    pub label: EntityLabel,
    pub confidence: f64,

    // Byte offsets into the text the entity was extracted from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl ExtractedEntity {
    pub fn new(text: &str, label: EntityLabel, confidence: f64) -> Self {
        ExtractedEntity {
            text: text.to_string(),
            label,
            confidence,
            start: None,
            end: None,
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn has_valid_confidence(&self) -> bool {
        (0.0..=1.0).contains(&self.confidence)
    }
}

/// Group entity texts by label, dropping repeats within a label while
/// keeping first-seen order.
pub fn group_by_label(
    entities: &[ExtractedEntity],
    only: Option<EntityLabel>,
) -> BTreeMap<EntityLabel, Vec<String>> {
    let mut grouped: BTreeMap<EntityLabel, Vec<String>> = BTreeMap::new();
    for entity in entities {
        if only.is_some_and(|label| label != entity.label) {
            continue;
        }
        let texts = grouped.entry(entity.label).or_default();
        if !texts.contains(&entity.text) {
            texts.push(entity.text.clone());
        }
    }
    grouped
}

/// Aggregate statistics over one extraction result
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntitySummary {
    pub total_entities: usize,
    pub unique_entities: usize,
    pub labels: BTreeMap<EntityLabel, usize>,
    pub average_confidence: f64,
}

impl EntitySummary {
    pub fn from_entities(entities: &[ExtractedEntity]) -> Self {
        if entities.is_empty() {
            return Self::default();
        }

        let unique_entities = entities
            .iter()
            .map(|entity| entity.text.to_lowercase())
            .collect::<HashSet<_>>()
            .len();

        let labels = group_by_label(entities, None)
            .into_iter()
            .map(|(label, texts)| (label, texts.len()))
            .collect();

        let average_confidence =
            entities.iter().map(|entity| entity.confidence).sum::<f64>() / entities.len() as f64;

        EntitySummary {
            total_entities: entities.len(),
            unique_entities,
            labels,
            average_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(text: &str, label: EntityLabel, confidence: f64) -> ExtractedEntity {
        ExtractedEntity::new(text, label, confidence)
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!(EntityLabel::from("Medication"), EntityLabel::Medication);
        assert_eq!(EntityLabel::from("Sign_symptom"), EntityLabel::Symptom);
        assert_eq!(EntityLabel::from("lab_value"), EntityLabel::Other);
        assert!(EntityLabel::Symptom.is_diagnostic());
        assert!(!EntityLabel::Anatomy.is_diagnostic());
    }

    #[test]
    fn test_entity_json_contract() {
        let parsed: ExtractedEntity =
            serde_json::from_str(r#"{"text":"metformin","label":"Medication","confidence":0.9}"#)
                .unwrap();
        assert_eq!(parsed, entity("metformin", EntityLabel::Medication, 0.9));
    }

    #[test]
    fn test_confidence_range() {
        assert!(entity("pain", EntityLabel::Symptom, 0.0).has_valid_confidence());
        assert!(entity("pain", EntityLabel::Symptom, 1.0).has_valid_confidence());
        assert!(!entity("pain", EntityLabel::Symptom, 1.2).has_valid_confidence());
        assert!(!entity("pain", EntityLabel::Symptom, f64::NAN).has_valid_confidence());
    }

    #[test]
    fn test_grouping_and_summary() {
        let entities = vec![
            entity("chest pain", EntityLabel::Symptom, 0.8),
            entity("pain", EntityLabel::Symptom, 0.8),
            entity("chest pain", EntityLabel::Symptom, 0.8),
            entity("metformin", EntityLabel::Medication, 0.6),
        ];

        let grouped = group_by_label(&entities, None);
        assert_eq!(grouped[&EntityLabel::Symptom], vec!["chest pain", "pain"]);

        let medications = group_by_label(&entities, Some(EntityLabel::Medication));
        assert_eq!(medications.len(), 1);

        let summary = EntitySummary::from_entities(&entities);
        assert_eq!(summary.total_entities, 4);
        assert_eq!(summary.unique_entities, 3);
        assert_eq!(summary.labels[&EntityLabel::Symptom], 2);
        assert!((summary.average_confidence - 0.75).abs() < 1e-9);

        assert_eq!(EntitySummary::from_entities(&[]), EntitySummary::default());
    }
}
