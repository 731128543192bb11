//! Infrastructure constants
//!
//! Domain defaults (thresholds, retries, question cap) live in
//! `cadgen_domain::constants`.

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Environment variable prefix; nested keys are separated by `__`
pub const CONFIG_ENV_PREFIX: &str = "CADGEN";

/// Separator between the prefix and nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Configuration file looked up when no path is given
pub const DEFAULT_CONFIG_FILENAME: &str = "cadgen.toml";

/// Directory name under the platform config dir
pub const DEFAULT_CONFIG_DIR: &str = "cadgen";

/// Reference library file name
pub const DEFAULT_REFERENCES_FILENAME: &str = "references.json";

// ============================================================================
// PROVIDER NAMES
// ============================================================================

/// Embedding providers the factory knows
pub const EMBEDDING_PROVIDERS: [&str; 3] = ["null", "ollama", "openai"];

/// Text generation providers the factory knows
pub const GENERATION_PROVIDERS: [&str; 2] = ["null", "ollama"];

/// Sandboxes the factory knows
pub const SANDBOX_PROVIDERS: [&str; 2] = ["null", "python"];

/// Default Ollama embedding model
pub const DEFAULT_OLLAMA_EMBEDDING_MODEL: &str = "all-minilm";

/// Default OpenAI embedding model
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default Ollama generation model
pub const DEFAULT_OLLAMA_GENERATION_MODEL: &str = "llama3.1:8b";

/// Request timeout of the embedding providers, in seconds
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// LOGGING
// ============================================================================

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV_VAR: &str = "CADGEN_LOG";

/// Level used when neither the environment nor the file sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// File stem of the rolling log when the configured path has none
pub const DEFAULT_LOG_FILE_STEM: &str = "cadgen";

// ============================================================================
// HTTP
// ============================================================================

/// Connection timeout of the shared HTTP client
pub const HTTP_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
