//! Use Cases
//!
//! | Use case | Role |
//! |----------|------|
//! | [`ReferenceStore`] | Reference records keyed by name |
//! | [`EmbeddingIndex`] | Snapshot-swapped cosine index |
//! | [`ReferenceLibrary`] | Store and index with one lifecycle |
//! | [`CodeSynthesizer`] | Prompt, generate, post-process, retry |
//! | [`ExecutionValidator`] | Static checks and sandboxed execution |
//! | [`ConversationEngine`] | The turn function |
//! | [`SessionRegistry`] | Live sessions, one turn at a time each |

pub mod conversation;
pub mod embedding_index;
pub mod reference_library;
pub mod reference_store;
pub mod session_registry;
pub mod synthesizer;
pub mod validator;

pub use conversation::{AssistantResponse, ConversationEngine, ConversationSettings};
pub use embedding_index::{EmbeddingIndex, IndexReport, IndexSnapshot};
pub use reference_library::ReferenceLibrary;
pub use reference_store::{LibraryStats, NewReference, ReferenceStore};
pub use session_registry::SessionRegistry;
pub use synthesizer::CodeSynthesizer;
pub use validator::ExecutionValidator;
