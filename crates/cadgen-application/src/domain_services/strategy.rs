//! Strategy Selection
//!
//! Maps the best similarity score of a retrieval to a generation strategy.
//! The mapping is an ordered table of `(lower bound, strategy)` rows; the
//! first row whose bound the score reaches wins, and anything below the
//! last bound (NaN included) falls through to intelligent reasoning.

use cadgen_domain::error::Result;
use cadgen_domain::value_objects::{Strategy, StrategyThresholds};

/// Total function from score to strategy
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySelector {
    bands: [(f64, Strategy); 3],
}

impl StrategySelector {
    /// Build a selector, rejecting overlapping or out-of-range bands
    pub fn new(thresholds: StrategyThresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self {
            bands: [
                (thresholds.direct_adaptation, Strategy::DirectAdaptation),
                (thresholds.pattern_combination, Strategy::PatternCombination),
                (thresholds.category_adaptation, Strategy::CategoryAdaptation),
            ],
        })
    }

    /// Strategy for a best-match score; boundaries belong to the higher band
    pub fn select(&self, best_score: f64) -> Strategy {
        self.bands
            .iter()
            .find(|(lower_bound, _)| best_score >= *lower_bound)
            .map_or(Strategy::IntelligentReasoning, |(_, strategy)| *strategy)
    }

    /// Score below which no reference is trusted
    pub fn floor(&self) -> f64 {
        self.bands[2].0
    }

    /// Current thresholds
    pub fn thresholds(&self) -> StrategyThresholds {
        StrategyThresholds {
            direct_adaptation: self.bands[0].0,
            pattern_combination: self.bands[1].0,
            category_adaptation: self.bands[2].0,
        }
    }
}

impl Default for StrategySelector {
    fn default() -> Self {
        let thresholds = StrategyThresholds::default();
        Self {
            bands: [
                (thresholds.direct_adaptation, Strategy::DirectAdaptation),
                (thresholds.pattern_combination, Strategy::PatternCombination),
                (thresholds.category_adaptation, Strategy::CategoryAdaptation),
            ],
        }
    }
}
