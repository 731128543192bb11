//! Application Port Interfaces
//!
//! Service contracts consumed by the conversation engine. Provider ports
//! live in `cadgen_domain::ports` and are re-exported here for convenience.

/// Application service interfaces
pub mod services;

pub use cadgen_domain::ports::providers;
pub use services::{
    CodeSynthesizerInterface, ScriptValidatorInterface, SimilaritySearchInterface,
    SynthesisRequest,
};
