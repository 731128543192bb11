//! Reference Repository Implementations
//!
//! | Repository | Storage |
//! |------------|---------|
//! | [`JsonFileReferenceRepository`] | One JSON document, rewritten atomically |
//! | [`InMemoryReferenceRepository`] | Process memory, for tests and ephemeral runs |

pub mod in_memory;
pub mod json_file;

pub use in_memory::InMemoryReferenceRepository;
pub use json_file::{JsonFileReferenceRepository, LibraryDocument};
