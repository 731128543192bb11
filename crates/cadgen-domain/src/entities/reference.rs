//! Reference example records

use serde::{Deserialize, Serialize};

use crate::value_objects::{CachedEmbedding, ComplexityTier, FeatureSpec, ParameterSpec};

/// Entity: annotated example script used as retrieval material
///
/// `name` is the identity and must be unique across the library. Apart
/// from the cached embedding, a record never changes after it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceExample {
    /// Unique key
    pub name: String,
    /// What the example models
    pub description: String,
    /// Parametric script source
    pub script: String,
    /// Complexity tier
    pub complexity: ComplexityTier,
    /// Category tag (primitive, functional, mechanical...)
    pub category: String,
    /// Declared parameters, in the order questions are asked
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
    /// Optional features the script contains
    #[serde(default)]
    pub features: Vec<FeatureSpec>,
    /// Cached embedding of [`ReferenceExample::embedding_text`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<CachedEmbedding>,
}

impl ReferenceExample {
    /// Text fed to the embedding model for this record
    ///
    /// The name's underscores become spaces so `simple_cylinder` matches
    /// "simple cylinder". Tier and category words help broad queries
    /// land in the right family.
    pub fn embedding_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.name.replace('_', " "),
            self.description,
            self.complexity,
            self.category
        )
    }

    /// Declared parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Whether the script contains the named optional feature
    pub fn has_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name == name)
    }

    /// Copy of this record carrying a new cached embedding
    pub fn with_embedding(&self, embedding: CachedEmbedding) -> Self {
        Self {
            embedding: Some(embedding),
            ..self.clone()
        }
    }
}
