//! Domain services
//!
//! Stateless logic used by the use cases. Nothing here performs I/O.

/// Parameter and toggle extraction from utterances
pub mod elicitation;
/// Intent classification of utterances
pub mod intent;
/// Prompt assembly for the generative collaborator
pub mod prompt;
/// Script extraction, binding and feature removal
pub mod script;
/// Score to strategy mapping
pub mod strategy;

pub use prompt::PromptBuilder;
pub use strategy::StrategySelector;
