//! Provider Ports
//!
//! | Port | Collaborator |
//! |------|--------------|
//! | [`EmbeddingProvider`] | Text to fixed-dimension vector |
//! | [`TextGenerationProvider`] | Prompt to free text |
//! | [`ScriptSandbox`] | Isolated script execution |
//! | [`ScriptSyntaxChecker`] | Parse-only check of the target scripting language |

/// Embedding provider port
pub mod embedding;
/// Text generation provider port
pub mod generation;
/// Script execution sandbox port
pub mod sandbox;
/// Syntax checker port
pub mod syntax;

pub use embedding::EmbeddingProvider;
pub use generation::{GenerationRequest, TextGenerationProvider};
pub use sandbox::{SandboxOutcome, ScriptSandbox};
pub use syntax::{ScriptSyntaxChecker, SyntaxIssue};
