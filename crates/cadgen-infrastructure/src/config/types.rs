//! Configuration types
//!
//! Every section has a complete default so that an empty file, or no file
//! at all, yields a working offline configuration.

use std::path::PathBuf;
use std::time::Duration;

use cadgen_domain::constants::{
    DEFAULT_EMBEDDING_ATTEMPTS, DEFAULT_MAX_QUESTIONS, DEFAULT_REPAIR_ATTEMPTS,
    DEFAULT_SANDBOX_TIMEOUT_SECS, DEFAULT_SYNTHESIS_RETRIES, DEFAULT_TOP_K,
};
use cadgen_domain::value_objects::{PerformanceMode, StrategyThresholds};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONFIG_DIR, DEFAULT_EMBEDDING_TIMEOUT_SECS, DEFAULT_LOG_LEVEL,
    DEFAULT_REFERENCES_FILENAME,
};

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalConfig,
    pub strategy: StrategyThresholds,
    pub conversation: ConversationConfig,
    pub sandbox: SandboxConfig,
    pub references: ReferencesConfig,
    pub logging: LoggingConfig,
}

/// Embedding provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider name (null, ollama, openai)
    pub provider: String,
    /// Model name; each provider has its own default
    pub model: Option<String>,
    /// Base URL of the API
    pub base_url: Option<String>,
    /// API key (openai)
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "null".to_string(),
            model: None,
            base_url: None,
            api_key: None,
            timeout_secs: DEFAULT_EMBEDDING_TIMEOUT_SECS,
        }
    }
}

impl EmbeddingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Text generation provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Provider name (null, ollama)
    pub provider: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    /// Fixes token limits, context window, temperature and call timeout
    pub performance_mode: PerformanceMode,
    /// Extra attempts after a rejected reply
    pub max_retries: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: "null".to_string(),
            model: None,
            base_url: None,
            performance_mode: PerformanceMode::default(),
            max_retries: DEFAULT_SYNTHESIS_RETRIES,
        }
    }
}

/// Similarity search configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Matches retrieved per query
    pub top_k: usize,
    /// Query embedding attempts before the service counts as unavailable
    pub attempts: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            attempts: DEFAULT_EMBEDDING_ATTEMPTS,
        }
    }
}

/// Conversation configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Questions asked before remaining parameters take their defaults
    pub max_questions: usize,
    /// Repair syntheses after a validation failure
    pub repair_attempts: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_questions: DEFAULT_MAX_QUESTIONS,
            repair_attempts: DEFAULT_REPAIR_ATTEMPTS,
        }
    }
}

/// Script sandbox configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Sandbox name (null, python)
    pub provider: String,
    /// Interpreter with CadQuery installed
    pub interpreter: String,
    /// Wall-clock limit per run, in seconds
    pub timeout_secs: u64,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            provider: "null".to_string(),
            interpreter: "python3".to_string(),
            timeout_secs: DEFAULT_SANDBOX_TIMEOUT_SECS,
        }
    }
}

impl SandboxConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Reference library location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencesConfig {
    /// JSON library file; created on the first added reference
    pub path: PathBuf,
}

impl Default for ReferencesConfig {
    fn default() -> Self {
        let base = dirs::data_dir().map_or_else(
            || PathBuf::from("."),
            |dir| dir.join(DEFAULT_CONFIG_DIR),
        );
        Self {
            path: base.join(DEFAULT_REFERENCES_FILENAME),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON output format
    pub json_format: bool,

    /// Log to a daily-rolling file in addition to stderr
    pub file_output: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            json_format: false,
            file_output: None,
        }
    }
}
