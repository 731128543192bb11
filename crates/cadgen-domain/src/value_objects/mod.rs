//! Domain Value Objects
//!
//! Immutable value objects that represent concepts in the domain
//! without identity.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`Embedding`] | Vector representation of text |
//! | [`CachedEmbedding`] | Embedding cached on a reference with its text digest |
//! | [`SimilarityMatch`] | Ranked result of a retrieval query |
//! | [`ComplexityTier`] | Ordinal complexity of a reference |
//! | [`Strategy`] | Confidence band governing reference use |
//! | [`ParameterSpec`] | Declared parameter with default and role |
//! | [`FeatureToggles`] | Enabled/disabled optional features |
//! | [`StrategyThresholds`] | Configurable band boundaries |
//! | [`PerformanceMode`] | Generation budget preset |

/// Complexity tiers
pub mod complexity;
/// Configuration value objects
pub mod config;
/// Semantic embedding value objects
pub mod embedding;
/// Parameter descriptions
pub mod parameters;
/// Search-related value objects
pub mod search;
/// Generation strategies
pub mod strategy;
/// Feature toggles
pub mod toggles;

pub use complexity::ComplexityTier;
pub use config::{GenerationBudget, PerformanceMode, StrategyThresholds};
pub use embedding::{CachedEmbedding, Embedding, text_digest};
pub use parameters::{ParameterRole, ParameterSpec, format_value};
pub use search::SimilarityMatch;
pub use strategy::Strategy;
pub use toggles::{FeatureSpec, FeatureToggles, ToggleDirective};
