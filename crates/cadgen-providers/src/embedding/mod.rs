//! Embedding Provider Implementations
//!
//! | Provider | Type |
//! |----------|------|
//! | [`NullEmbeddingProvider`] | Offline, deterministic feature hashing |
//! | [`OllamaEmbeddingProvider`] | Local server |
//! | [`OpenAIEmbeddingProvider`] | Cloud |

pub mod helpers;
pub mod null;
#[cfg(feature = "embedding-ollama")]
pub mod ollama;
#[cfg(feature = "embedding-openai")]
pub mod openai;

pub use helpers::constructor;
pub use null::NullEmbeddingProvider;
#[cfg(feature = "embedding-ollama")]
pub use ollama::OllamaEmbeddingProvider;
#[cfg(feature = "embedding-openai")]
pub use openai::OpenAIEmbeddingProvider;
