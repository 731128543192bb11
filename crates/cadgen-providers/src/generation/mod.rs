//! Text Generation Provider Implementations
//!
//! | Provider | Type |
//! |----------|------|
//! | [`NullGenerationProvider`] | Offline echo of the prompt's script |
//! | [`OllamaGenerationProvider`] | Local server |

pub mod null;
#[cfg(feature = "generation-ollama")]
pub mod ollama;

pub use null::NullGenerationProvider;
#[cfg(feature = "generation-ollama")]
pub use ollama::OllamaGenerationProvider;
