//! # cadgen - Provider Implementations
//!
//! Adapters for the ports defined in `cadgen-domain`.
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Embedding | `EmbeddingProvider` | Ollama, OpenAI, Null |
//! | Generation | `TextGenerationProvider` | Ollama, Null |
//! | Sandbox | `ScriptSandbox` | Python subprocess, Null |
//! | Syntax | `ScriptSyntaxChecker` | tree-sitter Python |
//! | Persistence | `ReferenceRepository` | JSON file, in-memory |
//!
//! ## Feature Flags
//!
//! HTTP-backed providers can be left out of minimal builds:
//!
//! ```toml
//! [dependencies]
//! cadgen-providers = { version = "0.1", default-features = false, features = ["embedding-ollama"] }
//! ```

pub use cadgen_domain::error::{Error, Result};
pub use cadgen_domain::ports::providers::{
    EmbeddingProvider, ScriptSandbox, ScriptSyntaxChecker, TextGenerationProvider,
};
pub use cadgen_domain::repositories::ReferenceRepository;

/// Provider-specific constants
pub mod constants;

/// Shared utilities for provider implementations
pub mod utils;

/// Embedding provider implementations
pub mod embedding;

/// Text generation provider implementations
pub mod generation;

/// Script sandbox implementations
pub mod sandbox;

/// Syntax checker implementations
pub mod syntax;

/// Reference repository implementations
pub mod repository;
