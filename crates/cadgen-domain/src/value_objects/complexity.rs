//! Complexity tiers of reference examples

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Ordinal complexity of a reference example
///
/// Ordering is meaningful: `Primitive < Functional < Mathematical < Manufacturing`.
/// Retrieval prefers the lower tier when two matches score equally.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    /// Basic solids: boxes, cylinders, plates
    #[default]
    Primitive,
    /// Everyday functional objects: mugs, hooks, stands
    Functional,
    /// Shapes driven by formulas: gears, springs, threads
    Mathematical,
    /// Parts tuned for a manufacturing process: hinges, joints, overhangs
    Manufacturing,
}

impl ComplexityTier {
    /// All tiers in ascending order
    pub const ALL: [Self; 4] = [
        Self::Primitive,
        Self::Functional,
        Self::Mathematical,
        Self::Manufacturing,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Functional => "functional",
            Self::Mathematical => "mathematical",
            Self::Manufacturing => "manufacturing",
        }
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplexityTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "simple", "medium", "complex" and "advanced" are accepted for older corpora
        match s.trim().to_lowercase().as_str() {
            "primitive" | "simple" => Ok(Self::Primitive),
            "functional" | "medium" => Ok(Self::Functional),
            "mathematical" | "complex" => Ok(Self::Mathematical),
            "manufacturing" | "advanced" => Ok(Self::Manufacturing),
            other => Err(Error::invalid_argument(format!(
                "unknown complexity tier '{other}'"
            ))),
        }
    }
}
