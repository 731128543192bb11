//! Error handling types

use std::time::Duration;

use thiserror::Error;

use crate::entities::artifact::Diagnostic;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for cadgen
#[derive(Error, Debug)]
pub enum Error {
    /// The embedding collaborator could not be reached
    #[error("Embedding service unavailable: {message}")]
    EmbeddingUnavailable {
        /// Description of the failure
        message: String,
        /// Last provider error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Embedding provider returned an unusable response
    #[error("Embedding provider error: {message}")]
    Embedding {
        /// Description of the embedding provider error
        message: String,
    },

    /// A vector does not have the dimensionality of the active index
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality of the index
        expected: usize,
        /// Dimensionality of the offending vector
        actual: usize,
    },

    /// Two candidate values were found for one parameter
    #[error("Ambiguous value for '{parameter}': {candidates:?}")]
    AmbiguousParameter {
        /// Parameter that received several values
        parameter: String,
        /// Values found in the utterance
        candidates: Vec<f64>,
    },

    /// Generation produced no usable script within the retry bound
    #[error("Script synthesis failed after {attempts} attempt(s): {diagnostic}")]
    SynthesisFailed {
        /// Number of generation attempts made
        attempts: usize,
        /// Reason the last attempt was rejected
        diagnostic: String,
    },

    /// The script still failed validation after its repair attempt
    #[error("Script validation failed: {diagnostic}")]
    ValidationFailed {
        /// Last diagnostic reported by the validator
        diagnostic: Diagnostic,
        /// Best-effort script
        script: String,
    },

    /// A reference with the same name already exists
    #[error("Reference '{name}' already exists")]
    DuplicateReferenceName {
        /// The duplicated name
        name: String,
    },

    /// The text generation collaborator failed
    #[error("Generation error: {message}")]
    Generation {
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The script sandbox could not run a script
    #[error("Sandbox error: {message}")]
    Sandbox {
        /// Description of the sandbox error
        message: String,
    },

    /// A bounded operation ran out of time
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// Operation that timed out
        operation: String,
        /// Time limit that was exceeded
        after: Duration,
    },

    /// The turn was cancelled before completing
    #[error("Operation cancelled")]
    Cancelled,

    /// The session no longer accepts turns
    #[error("Session has ended")]
    SessionEnded,

    /// Another turn is running for the same session
    #[error("A turn is already in progress for session {session_id}")]
    TurnInProgress {
        /// Session that is busy
        session_id: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O operation error (simple form)
    #[error("I/O error: {source}")]
    IoSimple {
        /// The underlying I/O error
        #[from]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Basic error creation methods
impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an embedding provider error
    pub fn embedding<S: Into<String>>(message: S) -> Self {
        Self::Embedding {
            message: message.into(),
        }
    }

    /// Create an embedding-unavailable error
    pub fn embedding_unavailable<S: Into<String>>(message: S) -> Self {
        Self::EmbeddingUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Create an embedding-unavailable error wrapping the last provider error
    pub fn embedding_unavailable_with_source<S: Into<String>>(message: S, source: Error) -> Self {
        Self::EmbeddingUnavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a generation error
    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::Generation {
            message: message.into(),
            source: None,
        }
    }

    /// Create a generation error with source
    pub fn generation_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Generation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a sandbox error
    pub fn sandbox<S: Into<String>>(message: S) -> Self {
        Self::Sandbox {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(operation: S, after: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            after,
        }
    }

    /// Create a duplicate reference error
    pub fn duplicate_reference<S: Into<String>>(name: S) -> Self {
        Self::DuplicateReferenceName { name: name.into() }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Configuration and I/O error creation methods
impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl Error {
    /// Whether a bounded local retry may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::EmbeddingUnavailable { .. } | Self::Generation { .. } | Self::Timeout { .. }
        )
    }
}
