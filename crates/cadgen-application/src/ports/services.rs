//! Application Service Port Interfaces
//!
//! The conversation engine talks to retrieval, synthesis and validation
//! through these traits so each can be replaced in tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use cadgen_domain::entities::{Diagnostic, GeneratedArtifact, ReferenceExample, ValidationResult};
use cadgen_domain::error::Result;
use cadgen_domain::value_objects::{FeatureToggles, SimilarityMatch, Strategy};

// ============================================================================
// Similarity Search Interface
// ============================================================================

/// Retrieval of reference examples by semantic similarity
#[async_trait]
pub trait SimilaritySearchInterface: Send + Sync {
    /// Top `k` matches for `text`, best first
    async fn search(&self, text: &str, k: usize) -> Result<Vec<SimilarityMatch>>;
}

// ============================================================================
// Code Synthesizer Interface
// ============================================================================

/// Everything the synthesizer needs for one script
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub strategy: Strategy,
    /// What the user asked for ("cup")
    pub object_label: String,
    /// Best match, used unless the strategy trusts no reference
    pub reference: Option<Arc<ReferenceExample>>,
    /// Further matches for pattern combination
    pub supporting: Vec<Arc<ReferenceExample>>,
    /// Values to bind in the script
    pub parameters: BTreeMap<String, f64>,
    pub toggles: FeatureToggles,
    /// Script to adapt instead of starting over
    pub prior_script: Option<String>,
    /// Validation failure the new script must fix
    pub repair: Option<Diagnostic>,
}

/// Script synthesis via the generative text collaborator
#[async_trait]
pub trait CodeSynthesizerInterface: Send + Sync {
    /// Produce a post-processed artifact or fail with `SynthesisFailed`
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<GeneratedArtifact>;
}

// ============================================================================
// Script Validator Interface
// ============================================================================

/// Execution check of generated scripts
#[async_trait]
pub trait ScriptValidatorInterface: Send + Sync {
    /// Run the artifact's script and report a structured result
    async fn validate(&self, artifact: &GeneratedArtifact) -> Result<ValidationResult>;
}
