//! Configuration Value Objects
//!
//! Engine settings that carry domain rules (threshold ordering, the budget
//! attached to each performance mode). Loading them is the
//! infrastructure layer's job.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CATEGORY_ADAPTATION_THRESHOLD, DIRECT_ADAPTATION_THRESHOLD, PATTERN_COMBINATION_THRESHOLD,
};
use crate::error::{Error, Result};

/// Lower bounds of the three reference-trusting strategy bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyThresholds {
    /// Scores at or above this select direct adaptation
    pub direct_adaptation: f64,
    /// Scores at or above this select pattern combination
    pub pattern_combination: f64,
    /// Scores at or above this select category adaptation; below it nothing is trusted
    pub category_adaptation: f64,
}

impl Default for StrategyThresholds {
    fn default() -> Self {
        Self {
            direct_adaptation: DIRECT_ADAPTATION_THRESHOLD,
            pattern_combination: PATTERN_COMBINATION_THRESHOLD,
            category_adaptation: CATEGORY_ADAPTATION_THRESHOLD,
        }
    }
}

impl StrategyThresholds {
    /// Bands must be strictly descending and lie inside [-1, 1]
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.direct_adaptation,
            self.pattern_combination,
            self.category_adaptation,
        ];
        if values
            .iter()
            .any(|v| !v.is_finite() || !(-1.0..=1.0).contains(v))
        {
            return Err(Error::config(format!(
                "strategy thresholds must lie in [-1, 1], got {values:?}"
            )));
        }
        if !(self.direct_adaptation > self.pattern_combination
            && self.pattern_combination > self.category_adaptation)
        {
            return Err(Error::config(format!(
                "strategy thresholds must be strictly descending, got {values:?}"
            )));
        }
        Ok(())
    }
}

/// Speed/quality trade-off of the generative collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceMode {
    Fast,
    #[default]
    Balanced,
    Quality,
}

/// Limits applied to one generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationBudget {
    /// Maximum tokens to generate
    pub max_tokens: usize,
    /// Context window of the model, in tokens
    pub context_window: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Wall-clock limit of one call
    pub timeout: Duration,
}

impl PerformanceMode {
    /// Budget fixed by this mode
    pub fn budget(&self) -> GenerationBudget {
        match self {
            Self::Fast => GenerationBudget {
                max_tokens: 512,
                context_window: 4096,
                temperature: 0.3,
                timeout: Duration::from_secs(120),
            },
            Self::Balanced => GenerationBudget {
                max_tokens: 1024,
                context_window: 8192,
                temperature: 0.2,
                timeout: Duration::from_secs(300),
            },
            Self::Quality => GenerationBudget {
                max_tokens: 2048,
                context_window: 16384,
                temperature: 0.1,
                timeout: Duration::from_secs(600),
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Quality => "quality",
        }
    }
}

impl fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "quality" => Ok(Self::Quality),
            other => Err(Error::invalid_argument(format!(
                "unknown performance mode '{other}'"
            ))),
        }
    }
}
