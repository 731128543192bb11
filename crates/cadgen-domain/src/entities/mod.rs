//! Domain Entities
//!
//! | Entity | Description |
//! |--------|-------------|
//! | [`ReferenceExample`] | Annotated example script, keyed by name |
//! | [`ConversationSession`] | Per-conversation state machine data |
//! | [`GeneratedArtifact`] | Synthesized script plus validation outcome |

/// Generated scripts and diagnostics
pub mod artifact;
/// Reference example records
pub mod reference;
/// Conversation sessions
pub mod session;

pub use artifact::{Diagnostic, DiagnosticKind, GeneratedArtifact, ValidationResult};
pub use reference::ReferenceExample;
pub use session::{
    ConversationSession, DetectedObject, PendingQuestion, SessionState, TurnRecord,
};
