use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::options::GenerationOptions;
use ollama_rs::Ollama;
use std::env;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

use crate::TARGET_LLM_REQUEST;

const DEFAULT_OLLAMA_HOST: &str = "http://localhost";
const DEFAULT_OLLAMA_PORT: u16 = 11434;
const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";

#[derive(Clone, Debug)]
pub struct LlmParams {
    pub ollama: Ollama,
    pub model: String,
    pub temperature: f32,
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl LlmParams {
    pub fn new(ollama: Ollama, model: &str) -> Self {
        LlmParams {
            ollama,
            model: model.to_string(),
            temperature: 0.0,
            request_timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }

    /// Read `OLLAMA_HOST`, `OLLAMA_PORT`, `OLLAMA_MODEL` and `LLM_TEMPERATURE`.
    pub fn from_env() -> Self {
        let host = env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_OLLAMA_HOST.to_string());
        let port = env::var("OLLAMA_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_OLLAMA_PORT);
        let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_OLLAMA_MODEL.to_string());
        let temperature: f32 = env::var("LLM_TEMPERATURE")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.0);

        info!(target: TARGET_LLM_REQUEST, "Using Ollama at {}:{} with model {}", host, port, model);

        let mut params = LlmParams::new(Ollama::new(host, port), &model);
        params.temperature = temperature;
        params
    }
}

/// Send a prompt to the model, retrying with exponential backoff on errors
/// and timeouts. Returns `None` once retries are exhausted.
pub async fn generate_llm_response(prompt: &str, params: &LlmParams) -> Option<String> {
    let mut backoff = 1;

    debug!(target: TARGET_LLM_REQUEST, "Sending prompt to {}: {}", params.model, prompt);

    for attempt in 1..=params.max_retries {
        let mut request = GenerationRequest::new(params.model.clone(), prompt.to_string());
        request.options = Some(GenerationOptions::default().temperature(params.temperature));

        match timeout(params.request_timeout, params.ollama.generate(request)).await {
            Ok(Ok(response)) if !response.response.trim().is_empty() => {
                debug!(target: TARGET_LLM_REQUEST, "LLM response received: {}", response.response);
                return Some(response.response);
            }
            Ok(Ok(_)) => {
                warn!(target: TARGET_LLM_REQUEST, "Empty LLM response ({}/{})", attempt, params.max_retries);
            }
            Ok(Err(e)) => {
                warn!(target: TARGET_LLM_REQUEST, "Error generating response ({}/{}): {}", attempt, params.max_retries, e);
            }
            Err(_) => {
                warn!(target: TARGET_LLM_REQUEST, "LLM request timed out ({}/{})", attempt, params.max_retries);
            }
        }

        if attempt < params.max_retries {
            debug!(target: TARGET_LLM_REQUEST, "Backing off for {} seconds before retry", backoff);
            sleep(Duration::from_secs(backoff)).await;
            backoff *= 2;
        }
    }

    error!(target: TARGET_LLM_REQUEST, "No response generated after {} attempts", params.max_retries);
    None
}
