use async_trait::async_trait;

use crate::error::Result;

/// One call to the generative text collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Full instruction text
    pub prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Context window to allocate, in tokens
    pub context_window: usize,
}

/// Generative Text Interface
///
/// The response is free text with no format guarantee; callers must
/// extract and check whatever they need from it.
#[async_trait]
pub trait TextGenerationProvider: Send + Sync {
    /// Generate a completion for the request
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Identifier of the implementation
    fn provider_name(&self) -> &str;

    /// Model used for generation
    fn model(&self) -> &str;
}
