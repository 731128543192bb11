//! Semantic Embedding Value Objects
//!
//! Vectors produced by the embedding collaborator, and the cache record
//! stored alongside a reference example.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Value Object: Semantic Text Embedding
///
/// ## Business Rules
///
/// - `dimensions` equals `vector.len()`
/// - Model name identifies the embedding generation method; vectors from
///   different models are never compared
///
/// ## Example
///
/// ```rust
/// use cadgen_domain::value_objects::Embedding;
///
/// let embedding = Embedding::new(vec![0.6, 0.8], "nomic-embed-text");
/// assert_eq!(embedding.dimensions, 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Embedding {
    /// The embedding vector values
    pub vector: Vec<f32>,
    /// Name of the model that generated this embedding
    pub model: String,
    /// Dimensionality of the embedding vector
    pub dimensions: usize,
}

impl Embedding {
    /// Build an embedding, deriving its dimensionality from the vector
    pub fn new(vector: Vec<f32>, model: impl Into<String>) -> Self {
        let dimensions = vector.len();
        Self {
            vector,
            model: model.into(),
            dimensions,
        }
    }

    /// Cosine similarity with another vector, computed in `f64`
    ///
    /// Returns `None` when the dimensionalities differ. A zero vector has
    /// similarity 0 with everything.
    pub fn cosine_similarity(&self, other: &[f32]) -> Option<f64> {
        if self.vector.len() != other.len() {
            return None;
        }
        let (mut dot, mut left, mut right) = (0.0_f64, 0.0_f64, 0.0_f64);
        for (a, b) in self.vector.iter().zip(other) {
            let (a, b) = (f64::from(*a), f64::from(*b));
            dot += a * b;
            left += a * a;
            right += b * b;
        }
        if left == 0.0 || right == 0.0 {
            return Some(0.0);
        }
        Some((dot / (left.sqrt() * right.sqrt())).clamp(-1.0, 1.0))
    }
}

/// Embedding cached on a reference, tagged with the text it was computed from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedEmbedding {
    /// The cached vector
    pub embedding: Embedding,
    /// SHA-256 of the embedded text
    pub text_digest: String,
}

impl CachedEmbedding {
    /// Cache `embedding` as the embedding of `text`
    pub fn new(embedding: Embedding, text: &str) -> Self {
        Self {
            embedding,
            text_digest: text_digest(text),
        }
    }

    /// Whether the cache can be reused for `text` under the given model
    pub fn is_current(&self, text: &str, model: &str, dimensions: usize) -> bool {
        self.embedding.model == model
            && self.embedding.dimensions == dimensions
            && self.embedding.vector.len() == dimensions
            && self.text_digest == text_digest(text)
    }
}

/// Hex SHA-256 digest of `text`
pub fn text_digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}
