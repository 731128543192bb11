//! Configuration
//!
//! [`AppConfig`] is the whole configuration tree; [`ConfigLoader`] merges
//! defaults, a TOML file and `CADGEN__` environment variables into it.

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, ConversationConfig, EmbeddingConfig, GenerationConfig, LoggingConfig,
    ReferencesConfig, RetrievalConfig, SandboxConfig,
};
