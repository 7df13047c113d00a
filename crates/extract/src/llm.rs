use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LlmError, LlmResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3";
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Anything that turns a prompt into reply text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> LlmResult<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl LlmConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[derive(Clone)]
pub struct OllamaClient {
    config: LlmConfig,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(LlmConfig::default())
    }
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let request = OllamaRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
            },
        };

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "Sending prompt to Ollama");

        let response = self.client.post(self.generate_url()).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let ollama_response: OllamaResponse = response.json().await?;

        if ollama_response.response.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(ollama_response.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = LlmConfig::new()
            .with_base_url("http://ollama:11434/")
            .with_model("mistral")
            .with_temperature(0.2);

        assert_eq!(config.model, "mistral");
        assert_eq!(config.temperature, 0.2);

        let client = OllamaClient::new(config);
        assert_eq!(client.generate_url(), "http://ollama:11434/api/generate");
    }

    #[test]
    fn test_request_shape() {
        let request = OllamaRequest {
            model: "llama3",
            prompt: "hello",
            stream: false,
            options: OllamaOptions { temperature: 0.0 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "llama3",
                "prompt": "hello",
                "stream": false,
                "options": { "temperature": 0.0 }
            })
        );
    }
}
