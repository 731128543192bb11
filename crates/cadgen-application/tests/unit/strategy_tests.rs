//! Tests for the strategy selector

use cadgen_application::domain_services::StrategySelector;
use cadgen_domain::value_objects::{Strategy, StrategyThresholds};

#[test]
fn test_band_boundaries_belong_to_higher_band() {
    let selector = StrategySelector::default();
    assert_eq!(selector.select(0.5), Strategy::DirectAdaptation);
    assert_eq!(selector.select(0.3), Strategy::PatternCombination);
    assert_eq!(selector.select(0.2), Strategy::CategoryAdaptation);
}

#[test]
fn test_scores_between_boundaries() {
    let selector = StrategySelector::default();
    assert_eq!(selector.select(0.99), Strategy::DirectAdaptation);
    assert_eq!(selector.select(0.4999), Strategy::PatternCombination);
    assert_eq!(selector.select(0.2999), Strategy::CategoryAdaptation);
    assert_eq!(selector.select(0.1999), Strategy::IntelligentReasoning);
    assert_eq!(selector.select(-0.4), Strategy::IntelligentReasoning);
}

#[test]
fn test_nan_score_falls_through() {
    let selector = StrategySelector::default();
    assert_eq!(selector.select(f64::NAN), Strategy::IntelligentReasoning);
}

#[test]
fn test_custom_thresholds() {
    let selector = StrategySelector::new(StrategyThresholds {
        direct_adaptation: 0.8,
        pattern_combination: 0.6,
        category_adaptation: 0.4,
    })
    .unwrap();
    assert_eq!(selector.select(0.7), Strategy::PatternCombination);
    assert_eq!(selector.floor(), 0.4);
    assert_eq!(selector.thresholds().direct_adaptation, 0.8);
}

#[test]
fn test_overlapping_thresholds_rejected() {
    let overlapping = StrategyThresholds {
        direct_adaptation: 0.3,
        pattern_combination: 0.3,
        category_adaptation: 0.2,
    };
    assert!(StrategySelector::new(overlapping).is_err());

    let out_of_range = StrategyThresholds {
        direct_adaptation: 1.5,
        pattern_combination: 0.3,
        category_adaptation: 0.2,
    };
    assert!(StrategySelector::new(out_of_range).is_err());
}

#[test]
fn test_regeneration_steps_down_one_band() {
    assert_eq!(
        Strategy::DirectAdaptation.next_lower(),
        Some(Strategy::PatternCombination)
    );
    assert_eq!(Strategy::IntelligentReasoning.next_lower(), None);
}
