//! Repository Interfaces
//!
//! | Repository | Description |
//! |------------|-------------|
//! | [`ReferenceRepository`] | Load and append reference examples |

/// Reference example persistence
pub mod reference_repository;

pub use reference_repository::ReferenceRepository;
