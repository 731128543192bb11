//! Null embedding provider for offline use and tests
//!
//! Feature-hashed bag of words: each content word is hashed into one of a
//! fixed number of buckets and the vector is L2-normalised. Texts sharing
//! words get positive cosine similarity, so retrieval behaves sensibly
//! without any model server.

use async_trait::async_trait;

use cadgen_domain::error::Result;
use cadgen_domain::ports::providers::EmbeddingProvider;
use cadgen_domain::value_objects::Embedding;

use crate::constants::{EMBEDDING_DIMENSION_NULL, EMBEDDING_MODEL_NULL};

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "of", "to", "in", "on", "for", "with", "i", "me", "my", "want",
    "need", "make", "create", "please", "some", "that", "this", "is", "it", "be", "can", "you",
    "would", "like", "design", "model",
];

/// Deterministic hashing embedder
///
/// # Example
///
/// ```rust
/// use cadgen_providers::embedding::NullEmbeddingProvider;
/// use cadgen_domain::ports::providers::EmbeddingProvider;
///
/// let provider = NullEmbeddingProvider::new();
/// assert_eq!(provider.dimensions(), 384);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NullEmbeddingProvider {
    dimensions: usize,
}

impl NullEmbeddingProvider {
    pub fn new() -> Self {
        Self {
            dimensions: EMBEDDING_DIMENSION_NULL,
        }
    }

    /// Provider with a custom number of buckets
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimensions];
        let lowered = text.to_lowercase();
        for token in lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty() && !STOPWORDS.contains(t))
        {
            let stem = stem(token);
            let bucket = (fnv1a(stem.as_bytes()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        vector
    }
}

impl Default for NullEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip a plural `s` from longer words ("mugs" and "mug" share a bucket)
fn stem(token: &str) -> &str {
    if token.len() > 3 && token.ends_with('s') && !token.ends_with("ss") {
        &token[..token.len() - 1]
    } else {
        token
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[async_trait]
impl EmbeddingProvider for NullEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        Ok(texts
            .iter()
            .map(|text| Embedding::new(self.vectorize(text), EMBEDDING_MODEL_NULL))
            .collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn provider_name(&self) -> &str {
        "null"
    }

    fn model(&self) -> &str {
        EMBEDDING_MODEL_NULL
    }
}
