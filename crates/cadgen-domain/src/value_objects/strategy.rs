//! Generation strategies

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How much a retrieved reference is trusted during generation
///
/// Variants are declared in descending order of confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Adapt the best match with parameter substitution and feature toggling only
    DirectAdaptation,
    /// Reuse structural patterns, possibly combining several matches
    PatternCombination,
    /// Trust only the category and tier of the best match
    CategoryAdaptation,
    /// No reference is trusted; design from first principles
    IntelligentReasoning,
}

impl Strategy {
    /// All strategies in descending order of confidence
    pub const ALL: [Self; 4] = [
        Self::DirectAdaptation,
        Self::PatternCombination,
        Self::CategoryAdaptation,
        Self::IntelligentReasoning,
    ];

    /// Whether a retrieved script is injected into the generation request
    pub fn uses_reference(&self) -> bool {
        !matches!(self, Self::IntelligentReasoning)
    }

    /// The next lower-confidence strategy, if any
    pub fn next_lower(&self) -> Option<Self> {
        match self {
            Self::DirectAdaptation => Some(Self::PatternCombination),
            Self::PatternCombination => Some(Self::CategoryAdaptation),
            Self::CategoryAdaptation => Some(Self::IntelligentReasoning),
            Self::IntelligentReasoning => None,
        }
    }

    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectAdaptation => "direct_adaptation",
            Self::PatternCombination => "pattern_combination",
            Self::CategoryAdaptation => "category_adaptation",
            Self::IntelligentReasoning => "intelligent_reasoning",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::DirectAdaptation => "direct adaptation",
            Self::PatternCombination => "pattern combination",
            Self::CategoryAdaptation => "category adaptation",
            Self::IntelligentReasoning => "intelligent reasoning",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| Error::invalid_argument(format!("unknown strategy '{s}'")))
    }
}
