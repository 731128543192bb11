//! # cadgen
//!
//! Conversational generation of parametric CadQuery scripts.
//!
//! A request such as "a coffee mug without a handle" is matched against a
//! library of annotated reference scripts, the missing dimensions are asked
//! for one at a time, and a script is synthesized by a generative model,
//! post-processed so every agreed value appears literally, and executed in
//! a sandbox before it is shown.
//!
//! ## Example
//!
//! ```ignore
//! use cadgen::infrastructure::{ConfigLoader, init_app};
//! use tokio_util::sync::CancellationToken;
//!
//! let context = init_app(ConfigLoader::new().load()?).await?;
//! context.initialize().await?;
//! let sessions = context.sessions();
//! let id = sessions.start();
//! let reply = sessions.advance(id, "I need a coffee mug", &CancellationToken::new()).await?;
//! println!("{}", reply.text());
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Entities, value objects, error type and port traits
//! - `application` - Strategy selection, elicitation, synthesis, validation, conversation
//! - `infrastructure` - Configuration, logging and service wiring
//! - `providers` - Embedding, generation, sandbox, syntax and storage adapters
//! - `cli` - The `cadgen` command line

/// Domain layer - core types
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use cadgen_domain::*;
}

/// Application layer - engine and services
pub mod application {
    pub use cadgen_application::*;
}

/// Infrastructure layer - config, logging and wiring
pub mod infrastructure {
    pub use cadgen_infrastructure::*;
}

/// Provider implementations
pub mod providers {
    pub use cadgen_providers::*;
}

/// Command line interface
pub mod cli;
