//! Service wiring
//!
//! ```text
//! AppConfig → factories → Arc<dyn Port> → ReferenceLibrary
//!                                       → CodeSynthesizer ┐
//!                                       → ExecutionValidator ┴→ ConversationEngine → SessionRegistry
//! ```
//!
//! Every collaborator is injected as `Arc<dyn Trait>`; the Null providers
//! make the whole engine usable offline.

pub mod bootstrap;
pub mod factory;

pub use bootstrap::{AppContext, ProviderSet, init_app, init_app_with};
pub use factory::{EmbeddingProviderFactory, GenerationProviderFactory, SandboxFactory};
