//! Ollama local model suggester.
//!
//! Ollama runs models locally without API keys. Install from: https://ollama.ai

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{AssayError, Result};
use crate::profile::Profile;

use super::prompts;
use super::suggester::{parse_directives, LlmConfig, TransformationSuggester};

/// Default Ollama API endpoint.
const DEFAULT_API_URL: &str = "http://localhost:11434/api/chat";

/// Suggester backed by a local Ollama server.
pub struct OllamaSuggester {
    client: Client,
    api_url: String,
    config: LlmConfig,
}

impl OllamaSuggester {
    /// Create with `llama3.2`. Make sure it is pulled: `ollama pull llama3.2`
    pub fn new() -> Result<Self> {
        Self::with_config(LlmConfig {
            model: "llama3.2".to_string(),
            ..LlmConfig::default()
        })
    }

    /// Create with custom configuration. `OLLAMA_HOST` overrides the endpoint.
    pub fn with_config(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| AssayError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_url = std::env::var("OLLAMA_HOST")
            .map(|host| api_url_for(&host))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self {
            client,
            api_url,
            config,
        })
    }

    fn request_body(&self, user_prompt: &str) -> Value {
        json!({
            "model": self.config.model,
            "stream": false,
            "format": "json",
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.max_tokens
            },
            "messages": [
                { "role": "system", "content": prompts::system_prompt() },
                { "role": "user", "content": user_prompt }
            ]
        })
    }

    fn send_message(&self, user_prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.api_url)
            .json(&self.request_body(user_prompt))
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    AssayError::Llm(
                        "Failed to connect to Ollama. Is it running? Start with: ollama serve"
                            .to_string(),
                    )
                } else {
                    AssayError::Llm(format!("Ollama request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();

            if error_text.contains("not found") {
                return Err(AssayError::Llm(format!(
                    "Model '{}' not found. Pull it with: ollama pull {}",
                    self.config.model, self.config.model
                )));
            }

            return Err(AssayError::Llm(format!(
                "Ollama error ({}): {}",
                status, error_text
            )));
        }

        let api_response: OllamaResponse = response
            .json()
            .map_err(|e| AssayError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        Ok(api_response.message.content)
    }
}

impl TransformationSuggester for OllamaSuggester {
    fn suggest(&self, profile: &Profile) -> Result<Value> {
        let prompt = prompts::transformation_prompt(profile)?;
        debug!(model = %self.config.model, url = %self.api_url, "requesting transformations from Ollama");
        let reply = self.send_message(&prompt)?;
        parse_directives(&reply)
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

fn api_url_for(host: &str) -> String {
    format!("{}/api/chat", host.trim_end_matches('/'))
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}
