//! Ollama embeddings over `/api/embeddings`, one request per text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use cadgen_domain::error::{Error, Result};
use cadgen_domain::ports::providers::EmbeddingProvider;
use cadgen_domain::value_objects::Embedding;

use crate::constants::{
    CONTENT_TYPE_JSON, EMBEDDING_DIMENSION_OLLAMA_DEFAULT, EMBEDDING_DIMENSION_OLLAMA_MINILM,
    EMBEDDING_DIMENSION_OLLAMA_MXBAI, EMBEDDING_DIMENSION_OLLAMA_NOMIC,
};
use crate::utils::HttpResponseUtils;

/// Embeds reference descriptions and user requests with a local Ollama model
pub struct OllamaEmbeddingProvider {
    base_url: String,
    model: String,
    timeout: Duration,
    http_client: Client,
}

impl OllamaEmbeddingProvider {
    pub fn new(base_url: String, model: String, timeout: Duration, http_client: Client) -> Self {
        Self {
            base_url,
            model,
            timeout,
            http_client,
        }
    }

    async fn fetch_single_embedding(&self, text: &str) -> Result<serde_json::Value> {
        let payload = serde_json::json!({
            "model": self.model,
            "prompt": text,
            "stream": false
        });

        let response = self
            .http_client
            .post(format!(
                "{}/api/embeddings",
                self.base_url.trim_end_matches('/')
            ))
            .header("Content-Type", CONTENT_TYPE_JSON)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                HttpResponseUtils::transport_error(&e, self.timeout, Error::embedding_unavailable)
            })?;

        HttpResponseUtils::check_and_parse(response, "Ollama", Error::embedding).await
    }

    fn parse_embedding(&self, response_data: &serde_json::Value) -> Result<Embedding> {
        let vector = response_data["embedding"]
            .as_array()
            .ok_or_else(|| Error::embedding("Invalid response format: missing embedding array"))?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect::<Vec<f32>>();

        Ok(Embedding::new(vector, self.model.clone()))
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // No batch endpoint
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            let response_data = self.fetch_single_embedding(text).await?;
            results.push(self.parse_embedding(&response_data)?);
        }

        Ok(results)
    }

    fn dimensions(&self) -> usize {
        match self.model.split(':').next().unwrap_or_default() {
            "nomic-embed-text" => EMBEDDING_DIMENSION_OLLAMA_NOMIC,
            "all-minilm" => EMBEDDING_DIMENSION_OLLAMA_MINILM,
            "mxbai-embed-large" => EMBEDDING_DIMENSION_OLLAMA_MXBAI,
            _ => EMBEDDING_DIMENSION_OLLAMA_DEFAULT,
        }
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
