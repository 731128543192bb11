use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::value_objects::Embedding;

/// Semantic Embedding Interface
///
/// Transforms text into fixed-dimension vectors. Implementations must be
/// deterministic for identical input and model version, because cached
/// reference vectors are compared against fresh query vectors.
///
/// # Default Implementations
///
/// `embed()` delegates to `embed_batch()` with a single item.
///
/// # Example
///
/// ```ignore
/// use cadgen_domain::ports::providers::EmbeddingProvider;
///
/// let embedding = provider.embed("a mug with a handle").await?;
/// assert_eq!(embedding.dimensions, provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get embedding for a single text (default implementation provided)
    async fn embed(&self, text: &str) -> Result<Embedding> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::embedding("No embedding returned"))
    }

    /// Get embeddings for multiple texts (must be implemented by provider)
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>>;

    /// Dimensionality of the produced vectors
    fn dimensions(&self) -> usize;

    /// Identifier of the implementation ("ollama", "openai", "null")
    fn provider_name(&self) -> &str;

    /// Model name recorded on every produced embedding
    fn model(&self) -> &str;
}
