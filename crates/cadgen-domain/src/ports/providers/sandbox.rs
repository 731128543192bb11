use std::time::Duration;

use async_trait::async_trait;

use crate::entities::Diagnostic;
use crate::error::Result;

/// What happened when a script ran
#[derive(Debug, Clone, PartialEq)]
pub enum SandboxOutcome {
    /// The script ran and produced a result
    Success,
    /// The script failed; the diagnostic says how
    Failure(Diagnostic),
}

/// Script Execution Interface
///
/// Runs a script in isolation from the host process. Script failures,
/// including running out of time, are reported as
/// [`SandboxOutcome::Failure`]; `Err` is reserved for the sandbox itself
/// being unusable (interpreter missing, temp file not writable).
#[async_trait]
pub trait ScriptSandbox: Send + Sync {
    /// Execute `script`, giving up after `timeout`
    async fn execute(&self, script: &str, timeout: Duration) -> Result<SandboxOutcome>;

    /// Identifier of the implementation
    fn sandbox_name(&self) -> &str;
}
