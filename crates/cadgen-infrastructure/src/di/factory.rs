//! Provider Factory
//!
//! Creates provider adapters from configuration. All implementations come
//! from `cadgen-providers`; this module only chooses and configures them.

use std::sync::Arc;

use cadgen_domain::error::{Error, Result};
use cadgen_domain::ports::providers::{EmbeddingProvider, ScriptSandbox, TextGenerationProvider};
use cadgen_providers::constants::OLLAMA_DEFAULT_URL;
use cadgen_providers::embedding::{
    NullEmbeddingProvider, OllamaEmbeddingProvider, OpenAIEmbeddingProvider,
};
use cadgen_providers::generation::{NullGenerationProvider, OllamaGenerationProvider};
use cadgen_providers::sandbox::{NullSandbox, PythonSandbox};
use reqwest::Client;

use crate::config::{EmbeddingConfig, GenerationConfig, SandboxConfig};
use crate::constants::{
    DEFAULT_OLLAMA_EMBEDDING_MODEL, HTTP_CONNECT_TIMEOUT, DEFAULT_OLLAMA_GENERATION_MODEL, DEFAULT_OPENAI_EMBEDDING_MODEL,
};

/// Known embedding provider names
pub mod embedding_providers {
    pub const NULL: &str = "null";
    pub const OLLAMA: &str = "ollama";
    pub const OPENAI: &str = "openai";
}

/// Known generation provider names
pub mod generation_providers {
    pub const NULL: &str = "null";
    pub const OLLAMA: &str = "ollama";
}

/// Known sandbox names
pub mod sandbox_providers {
    pub const NULL: &str = "null";
    pub const PYTHON: &str = "python";
}

/// Factory for creating embedding providers
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create an embedding provider based on configuration
    pub fn create(config: &EmbeddingConfig, http_client: &Client) -> Result<Arc<dyn EmbeddingProvider>> {
        match config.provider.to_lowercase().as_str() {
            embedding_providers::NULL => Ok(Arc::new(NullEmbeddingProvider::new())),
            embedding_providers::OLLAMA => Ok(Arc::new(OllamaEmbeddingProvider::new(
                config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| OLLAMA_DEFAULT_URL.to_string()),
                config
                    .model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OLLAMA_EMBEDDING_MODEL.to_string()),
                config.timeout(),
                http_client.clone(),
            ))),
            embedding_providers::OPENAI => {
                let api_key = config.api_key.clone().ok_or_else(|| {
                    Error::config("OpenAI embedding provider requires an API key")
                })?;
                Ok(Arc::new(OpenAIEmbeddingProvider::new(
                    api_key,
                    config.base_url.clone(),
                    config
                        .model
                        .clone()
                        .unwrap_or_else(|| DEFAULT_OPENAI_EMBEDDING_MODEL.to_string()),
                    config.timeout(),
                    http_client.clone(),
                )))
            }
            _ => Err(Error::config(format!(
                "Unknown embedding provider: {}",
                config.provider
            ))),
        }
    }
}

/// Factory for creating text generation providers
pub struct GenerationProviderFactory;

impl GenerationProviderFactory {
    /// Create a generation provider based on configuration
    ///
    /// The HTTP timeout follows the performance mode; the synthesizer
    /// enforces the same bound around each call.
    pub fn create(
        config: &GenerationConfig,
        http_client: &Client,
    ) -> Result<Arc<dyn TextGenerationProvider>> {
        match config.provider.to_lowercase().as_str() {
            generation_providers::NULL => Ok(Arc::new(NullGenerationProvider::new())),
            generation_providers::OLLAMA => Ok(Arc::new(OllamaGenerationProvider::new(
                config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| OLLAMA_DEFAULT_URL.to_string()),
                config
                    .model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_OLLAMA_GENERATION_MODEL.to_string()),
                config.performance_mode.budget().timeout,
                http_client.clone(),
            ))),
            _ => Err(Error::config(format!(
                "Unknown generation provider: {}",
                config.provider
            ))),
        }
    }
}

/// Factory for creating script sandboxes
pub struct SandboxFactory;

impl SandboxFactory {
    pub fn create(config: &SandboxConfig) -> Result<Arc<dyn ScriptSandbox>> {
        match config.provider.to_lowercase().as_str() {
            sandbox_providers::NULL => Ok(Arc::new(NullSandbox::new())),
            sandbox_providers::PYTHON => Ok(Arc::new(PythonSandbox::new(config.interpreter.clone()))),
            _ => Err(Error::config(format!(
                "Unknown sandbox provider: {}",
                config.provider
            ))),
        }
    }
}

/// Shared HTTP client for the API-backed providers
///
/// Request timeouts are set per call by each provider.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .build()
        .map_err(|e| Error::config_with_source("Failed to build HTTP client", e))
}
