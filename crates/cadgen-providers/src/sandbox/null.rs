//! Null sandbox for offline use

use std::time::Duration;

use async_trait::async_trait;

use cadgen_domain::error::Result;
use cadgen_domain::ports::providers::{SandboxOutcome, ScriptSandbox};

/// Sandbox that reports success without running anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSandbox;

impl NullSandbox {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScriptSandbox for NullSandbox {
    async fn execute(&self, _script: &str, _timeout: Duration) -> Result<SandboxOutcome> {
        Ok(SandboxOutcome::Success)
    }

    fn sandbox_name(&self) -> &str {
        "null"
    }
}
