//! Tests for configuration value objects

use std::time::Duration;

use cadgen_domain::value_objects::{PerformanceMode, StrategyThresholds};

#[test]
fn test_default_thresholds_are_valid() {
    let thresholds = StrategyThresholds::default();
    assert_eq!(thresholds.direct_adaptation, 0.5);
    assert_eq!(thresholds.pattern_combination, 0.3);
    assert_eq!(thresholds.category_adaptation, 0.2);
    assert!(thresholds.validate().is_ok());
}

#[test]
fn test_thresholds_must_descend() {
    let thresholds = StrategyThresholds {
        direct_adaptation: 0.3,
        pattern_combination: 0.3,
        category_adaptation: 0.2,
    };
    assert!(thresholds.validate().is_err());
}

#[test]
fn test_thresholds_must_be_in_range() {
    let thresholds = StrategyThresholds {
        direct_adaptation: 1.5,
        pattern_combination: 0.3,
        category_adaptation: 0.2,
    };
    assert!(thresholds.validate().is_err());
}

#[test]
fn test_performance_budgets() {
    let fast = PerformanceMode::Fast.budget();
    assert_eq!(fast.max_tokens, 512);
    assert_eq!(fast.context_window, 4096);
    assert_eq!(fast.timeout, Duration::from_secs(120));

    let balanced = PerformanceMode::default().budget();
    assert_eq!(balanced.max_tokens, 1024);
    assert_eq!(balanced.context_window, 8192);

    let quality = PerformanceMode::Quality.budget();
    assert_eq!(quality.context_window, 16384);
    assert!(quality.temperature < fast.temperature);
}
