//! Ollama Text Generation Provider
//!
//! Implements the TextGenerationProvider port using Ollama's
//! `/api/generate` endpoint with streaming disabled. The performance
//! budget maps onto Ollama's `temperature`, `num_predict` and `num_ctx`
//! options.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use cadgen_domain::error::{Error, Result};
use cadgen_domain::ports::providers::{GenerationRequest, TextGenerationProvider};

use crate::constants::CONTENT_TYPE_JSON;
use crate::utils::HttpResponseUtils;

/// Ollama generation provider
pub struct OllamaGenerationProvider {
    base_url: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OllamaGenerationProvider {
    /// Create a new Ollama generation provider
    ///
    /// # Arguments
    /// * `base_url` - Ollama server URL (e.g., "http://localhost:11434")
    /// * `model` - Model name (e.g., "codellama:13b")
    /// * `timeout` - Request timeout duration
    /// * `http_client` - Reqwest HTTP client for making API requests
    pub fn new(base_url: String, model: String, timeout: Duration, http_client: Client) -> Self {
        Self {
            base_url,
            model,
            timeout,
            http_client,
        }
    }
}

#[async_trait]
impl TextGenerationProvider for OllamaGenerationProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let payload = serde_json::json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": false,
            "options": {
                "temperature": request.temperature,
                "num_predict": request.max_tokens,
                "num_ctx": request.context_window,
            }
        });

        let response = self
            .http_client
            .post(format!(
                "{}/api/generate",
                self.base_url.trim_end_matches('/')
            ))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| HttpResponseUtils::transport_error(&e, self.timeout, Error::generation))?;

        let data = HttpResponseUtils::check_and_parse(response, "Ollama", Error::generation).await?;
        let text = data["response"]
            .as_str()
            .ok_or_else(|| Error::generation("Invalid response format: missing response text"))?;
        debug!(model = %self.model, chars = text.len(), "Generation complete");
        Ok(text.to_string())
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
