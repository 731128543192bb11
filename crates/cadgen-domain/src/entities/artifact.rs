//! Generated scripts and their validation outcome

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::{FeatureToggles, Strategy};

/// Entity: a synthesized script together with the inputs that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub id: Uuid,
    /// Script source after post-processing
    pub script_text: String,
    /// Strategy used for synthesis
    pub source_strategy: Strategy,
    /// Reference the script was adapted from, if any
    pub reference_name: Option<String>,
    /// Snapshot of the bound parameter values
    pub parameters_used: BTreeMap<String, f64>,
    /// Snapshot of the feature toggles
    pub toggles_used: FeatureToggles,
    /// Generation attempts it took to obtain this script
    pub attempts: usize,
    /// Set once the execution validator has run
    pub validation: Option<ValidationResult>,
    pub created_at: DateTime<Utc>,
}

impl GeneratedArtifact {
    /// New, not yet validated artifact
    pub fn new(
        script_text: String,
        source_strategy: Strategy,
        reference_name: Option<String>,
        parameters_used: BTreeMap<String, f64>,
        toggles_used: FeatureToggles,
        attempts: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            script_text,
            source_strategy,
            reference_name,
            parameters_used,
            toggles_used,
            attempts,
            validation: None,
            created_at: Utc::now(),
        }
    }
}

/// Outcome of running a script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "diagnostic", rename_all = "snake_case")]
pub enum ValidationResult {
    Passed,
    Failed(Diagnostic),
}

impl ValidationResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Diagnostic of a failed run
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Passed => None,
            Self::Failed(diagnostic) => Some(diagnostic),
        }
    }
}

/// Category of a script failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A name used by the script is never defined
    UndefinedParameter,
    /// The geometry kernel could not build a shape
    GeometricDegeneracy,
    /// A dimension or count is zero or negative
    InvalidDimension,
    /// The script does not parse
    Syntax,
    /// The script never assigns `result`
    MissingResult,
    /// The run exceeded its wall-clock limit
    Timeout,
    /// Any other runtime error
    Runtime,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UndefinedParameter => "undefined parameter",
            Self::GeometricDegeneracy => "geometric degeneracy",
            Self::InvalidDimension => "invalid dimension",
            Self::Syntax => "syntax error",
            Self::MissingResult => "missing result",
            Self::Timeout => "timeout",
            Self::Runtime => "runtime error",
        }
    }
}

/// Structured description of a script failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Offending construct (variable name, operation) when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub construct: Option<String>,
    /// 1-based source line when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            construct: None,
            line: None,
        }
    }

    pub fn with_construct(mut self, construct: impl Into<String>) -> Self {
        self.construct = Some(construct.into());
        self
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)?;
        if let Some(construct) = &self.construct {
            write!(f, " ({construct})")?;
        }
        if let Some(line) = self.line {
            write!(f, " at line {line}")?;
        }
        Ok(())
    }
}
