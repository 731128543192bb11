//! Script Sandbox Implementations
//!
//! | Sandbox | Isolation |
//! |---------|-----------|
//! | [`PythonSandbox`] | Separate interpreter process, killed on timeout |
//! | [`NullSandbox`] | None; accepts every script |

pub mod null;
pub mod python;

pub use null::NullSandbox;
pub use python::{HarnessReport, PythonSandbox, classify_report};
