//! # cadgen Domain Layer
//!
//! Core types for the conversational CAD script generator. Nothing in this
//! crate performs I/O: reference records, sessions and artifacts are plain
//! data, and every external collaborator (embedding model, text generator,
//! script sandbox, reference storage) is described by a port trait that
//! outer layers implement.
//!
//! ## Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`entities`] | `ReferenceExample`, `ConversationSession`, `GeneratedArtifact` |
//! | [`value_objects`] | Embeddings, strategies, parameters, toggles, thresholds |
//! | [`ports`] | Provider traits for embedding, generation, sandbox, syntax checking |
//! | [`repositories`] | Reference persistence port |
//! | [`error`] | Domain error type shared by every layer |
//! | [`constants`] | Default thresholds, bounds and the feature lexicon |

/// Domain constants
pub mod constants;
/// Domain entities with identity
pub mod entities;
/// Error handling types
pub mod error;
/// Provider port interfaces
pub mod ports;
/// Repository port interfaces
pub mod repositories;
/// Immutable value objects
pub mod value_objects;

pub use error::{Error, Result};
