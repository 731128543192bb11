//! Provider Constants
//!
//! Constants specific to provider implementations. Domain defaults live in
//! `cadgen_domain::constants`.

// ============================================================================
// EMBEDDING PROVIDER CONSTANTS
// ============================================================================

/// Null embedding provider dimension
pub const EMBEDDING_DIMENSION_NULL: usize = 384;

/// Model name recorded on null embeddings
pub const EMBEDDING_MODEL_NULL: &str = "null-hash";

/// OpenAI text-embedding-3-small dimension
pub const EMBEDDING_DIMENSION_OPENAI_SMALL: usize = 1536;

/// OpenAI text-embedding-3-large dimension
pub const EMBEDDING_DIMENSION_OPENAI_LARGE: usize = 3072;

/// OpenAI text-embedding-ada-002 dimension
pub const EMBEDDING_DIMENSION_OPENAI_ADA: usize = 1536;

/// Ollama nomic-embed-text dimension
pub const EMBEDDING_DIMENSION_OLLAMA_NOMIC: usize = 768;

/// Ollama all-minilm dimension
pub const EMBEDDING_DIMENSION_OLLAMA_MINILM: usize = 384;

/// Ollama mxbai-embed-large dimension
pub const EMBEDDING_DIMENSION_OLLAMA_MXBAI: usize = 1024;

/// Ollama default dimension
pub const EMBEDDING_DIMENSION_OLLAMA_DEFAULT: usize = 768;

// ============================================================================
// HTTP CONSTANTS
// ============================================================================

/// Ollama server default URL
pub const OLLAMA_DEFAULT_URL: &str = "http://localhost:11434";

/// OpenAI API default URL
pub const OPENAI_DEFAULT_URL: &str = "https://api.openai.com/v1";

/// JSON content type header value
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Error message prefix for request timeouts
pub const ERROR_MSG_REQUEST_TIMEOUT: &str = "Request timed out after";

// ============================================================================
// SANDBOX CONSTANTS
// ============================================================================

/// Interpreter used when none is configured
pub const DEFAULT_PYTHON_INTERPRETER: &str = "python3";

/// Bytes of stderr kept in a diagnostic when the harness produced no report
pub const STDERR_TAIL_BYTES: usize = 600;

// ============================================================================
// GENERATION CONSTANTS
// ============================================================================

/// Model name reported by the null generator
pub const GENERATION_MODEL_NULL: &str = "null-echo";
