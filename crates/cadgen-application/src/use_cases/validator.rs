//! Execution Validator Use Case
//!
//! Runs a generated script in the sandbox under a wall-clock limit and
//! reports a structured [`ValidationResult`]. Cheap static checks run first
//! so that obviously broken parameters never reach the sandbox.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cadgen_domain::constants::DEFAULT_SANDBOX_TIMEOUT_SECS;
use cadgen_domain::entities::{Diagnostic, DiagnosticKind, GeneratedArtifact, ValidationResult};
use cadgen_domain::error::Result;
use cadgen_domain::ports::providers::{SandboxOutcome, ScriptSandbox};
use cadgen_domain::value_objects::{ParameterRole, format_value};
use tracing::{debug, warn};

use crate::domain_services::script::assigns_result;
use crate::ports::services::ScriptValidatorInterface;

/// Validator backed by a script sandbox
pub struct ExecutionValidator {
    sandbox: Arc<dyn ScriptSandbox>,
    timeout: Duration,
}

impl ExecutionValidator {
    pub fn new(sandbox: Arc<dyn ScriptSandbox>) -> Self {
        Self {
            sandbox,
            timeout: Duration::from_secs(DEFAULT_SANDBOX_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Failures detectable without running the script
    pub fn static_check(artifact: &GeneratedArtifact) -> Option<Diagnostic> {
        for (name, value) in &artifact.parameters_used {
            if ParameterRole::infer(name).must_be_positive() && *value <= 0.0 {
                return Some(
                    Diagnostic::new(
                        DiagnosticKind::InvalidDimension,
                        format!("{name} must be positive, got {}", format_value(*value)),
                    )
                    .with_construct(name.clone()),
                );
            }
        }
        if !assigns_result(&artifact.script_text) {
            return Some(Diagnostic::new(
                DiagnosticKind::MissingResult,
                "the script never assigns `result`",
            ));
        }
        None
    }
}

#[async_trait]
impl ScriptValidatorInterface for ExecutionValidator {
    async fn validate(&self, artifact: &GeneratedArtifact) -> Result<ValidationResult> {
        if let Some(diagnostic) = Self::static_check(artifact) {
            debug!(artifact = %artifact.id, %diagnostic, "Static check failed");
            return Ok(ValidationResult::Failed(diagnostic));
        }

        // Sandboxes enforce the limit themselves; this is the outer bound
        let grace = self.timeout + Duration::from_secs(1);
        let outcome = match tokio::time::timeout(
            grace,
            self.sandbox.execute(&artifact.script_text, self.timeout),
        )
        .await
        {
            Ok(outcome) => outcome?,
            Err(_) => SandboxOutcome::Failure(Diagnostic::new(
                DiagnosticKind::Timeout,
                format!("execution exceeded {:?}", self.timeout),
            )),
        };

        Ok(match outcome {
            SandboxOutcome::Success => {
                debug!(artifact = %artifact.id, sandbox = self.sandbox.sandbox_name(), "Script validated");
                ValidationResult::Passed
            }
            SandboxOutcome::Failure(diagnostic) => {
                warn!(artifact = %artifact.id, %diagnostic, "Script failed in sandbox");
                ValidationResult::Failed(diagnostic)
            }
        })
    }
}
