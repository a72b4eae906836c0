use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::types::{EntityLabel, ExtractedEntity};
use super::TARGET_ENTITY;
use crate::error::ExtractionError;
use crate::llm::{generate_llm_response, LlmParams};

/// Model-backed extractor: asks an LLM for clinical entities as JSON
#[derive(Debug, Clone)]
pub struct ModelEntityExtractor {
    params: LlmParams,
}

impl ModelEntityExtractor {
    pub fn new(params: LlmParams) -> Self {
        Self { params }
    }

    pub fn model(&self) -> &str {
        &self.params.model
    }

    pub async fn extract(&self, text: &str) -> Result<Vec<ExtractedEntity>, ExtractionError> {
        let prompt = entity_extraction_prompt(text);

        let response = match generate_llm_response(&prompt, &self.params).await {
            Some(response) => response,
            None => {
                error!(target: TARGET_ENTITY, "Failed to generate entity extraction response");
                return Err(ExtractionError::Model(format!(
                    "no response from model {}",
                    self.params.model
                )));
            }
        };

        let entities = parse_entity_response(&response)?;
        info!(
            target: TARGET_ENTITY,
            "Model extracted {} entities", entities.len()
        );
        Ok(entities)
    }
}

pub fn entity_extraction_prompt(text: &str) -> String {
    format!(
        r#"Extract the clinical entities mentioned in the text below.

Respond with JSON only, in exactly this shape:
{{"entities": [{{"text": "<span as written>", "label": "DISEASE|SYMPTOM|MEDICATION|ANATOMY|OTHER", "confidence": <0.0-1.0>}}]}}

Text:
{}"#,
        text
    )
}

/// Parse the model's JSON, tolerating prose or code fences around it.
pub fn parse_entity_response(response: &str) -> Result<Vec<ExtractedEntity>, ExtractionError> {
    let json_str = match (response.find('{'), response.rfind('}')) {
        (Some(start), Some(end)) if start < end => &response[start..=end],
        _ => {
            return Err(ExtractionError::Response(
                "no JSON object in response".to_string(),
            ))
        }
    };

    let json: Value = serde_json::from_str(json_str).map_err(|e| {
        error!(
            target: TARGET_ENTITY,
            "Failed to parse JSON: {}. Raw content: {}",
            e,
            preview(json_str, 500)
        );
        ExtractionError::Response(format!("invalid JSON: {}", e))
    })?;

    let entities = json
        .get("entities")
        .and_then(Value::as_array)
        .ok_or_else(|| ExtractionError::Response("missing 'entities' array".to_string()))?;

    let parsed: Vec<ExtractedEntity> = entities.iter().filter_map(parse_entity_object).collect();

    debug!(
        target: TARGET_ENTITY,
        "Parsed {} of {} entities from model response",
        parsed.len(),
        entities.len()
    );

    Ok(parsed)
}

// At most `max_chars` characters, cut on a char boundary
fn preview(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(end, _)| &text[..end])
}

fn parse_entity_object(value: &Value) -> Option<ExtractedEntity> {
    let text = value
        .get("text")
        .or_else(|| value.get("name"))
        .and_then(Value::as_str)?
        .trim();
    if text.is_empty() {
        return None;
    }

    let label = value
        .get("label")
        .or_else(|| value.get("type"))
        .and_then(Value::as_str)
        .map(EntityLabel::from)
        .unwrap_or(EntityLabel::Other);

    let confidence = value.get("confidence").and_then(Value::as_f64)?;
    if !(0.0..=1.0).contains(&confidence) {
        warn!(
            target: TARGET_ENTITY,
            "Dropping entity '{}' with out-of-range confidence {}", text, confidence
        );
        return None;
    }

    Some(ExtractedEntity::new(text, label, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let entities = parse_entity_response(
            r#"{"entities": [
                {"text": "metformin", "label": "MEDICATION", "confidence": 0.93},
                {"text": "type 2 diabetes", "label": "disease", "confidence": 0.88}
            ]}"#,
        )
        .unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].label, EntityLabel::Medication);
        assert_eq!(entities[1].label, EntityLabel::Disease);
    }

    #[test]
    fn test_parse_fenced_json_and_skip_bad_items() {
        let response = "Here you go:\n```json\n{\"entities\": [\
            {\"name\": \"cough\", \"type\": \"SYMPTOM\", \"confidence\": 0.7},\
            {\"text\": \"fever\", \"label\": \"SYMPTOM\", \"confidence\": 1.7},\
            {\"text\": \"\", \"label\": \"SYMPTOM\", \"confidence\": 0.5},\
            {\"text\": \"aspirin\", \"label\": \"MEDICATION\"}\
        ]}\n```";
        let entities = parse_entity_response(response).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "cough");
    }

    #[test]
    fn test_parse_rejects_unusable_responses() {
        assert!(matches!(
            parse_entity_response("I cannot help with that"),
            Err(ExtractionError::Response(_))
        ));
        assert!(matches!(
            parse_entity_response(r#"{"items": []}"#),
            Err(ExtractionError::Response(_))
        ));
    }

    #[test]
    fn test_invalid_non_ascii_response_is_logged_safely() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        // The 500th byte falls inside "é"
        let response = format!("{{{}é bad}}", "a".repeat(498));

        let result = tracing::subscriber::with_default(subscriber, || {
            parse_entity_response(&response)
        });
        assert!(matches!(result, Err(ExtractionError::Response(_))));
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("añb", 2), "añ");
        assert_eq!(preview("short", 500), "short");
        assert_eq!(preview(&"é".repeat(600), 500).chars().count(), 500);
    }

    #[test]
    fn test_prompt_contains_text() {
        let prompt = entity_extraction_prompt("Acute chest pain");
        assert!(prompt.contains("Acute chest pain"));
        assert!(prompt.contains("\"entities\""));
    }
}
