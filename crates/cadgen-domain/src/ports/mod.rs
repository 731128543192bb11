//! Domain Port Interfaces
//!
//! Contracts for the external collaborators of the engine. The domain
//! defines them; `cadgen-providers` implements them.
//!
//! ## Organization
//!
//! - **providers/** - Embedding model, text generator, script sandbox, syntax checker

/// External service provider ports
pub mod providers;

pub use providers::{
    EmbeddingProvider, GenerationRequest, SandboxOutcome, ScriptSandbox, ScriptSyntaxChecker,
    SyntaxIssue, TextGenerationProvider,
};
