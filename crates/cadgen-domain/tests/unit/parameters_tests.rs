//! Tests for parameter, toggle and tier value objects

use std::str::FromStr;

use cadgen_domain::value_objects::{
    ComplexityTier, FeatureSpec, FeatureToggles, ParameterRole, ParameterSpec, Strategy,
    ToggleDirective, format_value,
};

#[test]
fn test_role_inference() {
    assert_eq!(ParameterRole::infer("radius"), ParameterRole::Radius);
    assert_eq!(ParameterRole::infer("mug_height"), ParameterRole::Height);
    assert_eq!(ParameterRole::infer("handle_width"), ParameterRole::Width);
    assert_eq!(ParameterRole::infer("wall_thickness"), ParameterRole::Thickness);
    assert_eq!(ParameterRole::infer("pitch_diameter"), ParameterRole::Diameter);
    assert_eq!(ParameterRole::infer("num_teeth"), ParameterRole::Count);
    assert_eq!(ParameterRole::infer("tooth_count"), ParameterRole::Count);
    assert_eq!(ParameterRole::infer("helix_angle"), ParameterRole::Angle);
    assert_eq!(ParameterRole::infer("rounded_corner"), ParameterRole::Other);
}

#[test]
fn test_derived_spec_requiredness() {
    assert!(ParameterSpec::derived("radius", 40.0, None).required);
    assert!(ParameterSpec::derived("num_teeth", 24.0, None).required);
    assert!(!ParameterSpec::derived("wall_thickness", 3.0, None).required);
    assert!(!ParameterSpec::derived("rim_fillet", 1.0, None).required);
    assert!(!ParameterSpec::derived("helix_angle", 15.0, None).required);
    assert!(
        !ParameterSpec::derived("handle_width", 8.0, Some("handle".to_string())).required
    );
}

#[test]
fn test_display_name() {
    let spec = ParameterSpec::new("handle_width", 8.0);
    assert_eq!(spec.display_name(), "handle width");
}

#[test]
fn test_format_value() {
    assert_eq!(format_value(100.0), "100");
    assert_eq!(format_value(2.5), "2.5");
    assert_eq!(format_value(-3.0), "-3");
}

#[test]
fn test_complexity_ordering_and_aliases() {
    assert!(ComplexityTier::Primitive < ComplexityTier::Functional);
    assert!(ComplexityTier::Functional < ComplexityTier::Mathematical);
    assert!(ComplexityTier::Mathematical < ComplexityTier::Manufacturing);
    assert_eq!(
        ComplexityTier::from_str("medium").unwrap(),
        ComplexityTier::Functional
    );
    assert!(ComplexityTier::from_str("galactic").is_err());
}

#[test]
fn test_strategy_ladder() {
    assert_eq!(
        Strategy::DirectAdaptation.next_lower(),
        Some(Strategy::PatternCombination)
    );
    assert_eq!(Strategy::IntelligentReasoning.next_lower(), None);
    assert!(!Strategy::IntelligentReasoning.uses_reference());
    assert_eq!(
        Strategy::from_str("category adaptation").unwrap(),
        Strategy::CategoryAdaptation
    );
}

#[test]
fn test_toggles() {
    let features = vec![FeatureSpec {
        name: "handle".to_string(),
        keyword: "handle".to_string(),
        default_enabled: true,
    }];
    let mut toggles = FeatureToggles::from_defaults(&features);
    assert!(toggles.is_enabled("handle"));
    assert!(toggles.is_enabled("lid"));

    toggles.set("handle", false);
    assert!(!toggles.is_enabled("handle"));
    assert_eq!(toggles.disabled().collect::<Vec<_>>(), vec!["handle"]);
    assert_eq!(
        toggles.directives(),
        vec![ToggleDirective::Omit("handle".to_string())]
    );
    assert_eq!(toggles.directives()[0].to_string(), "omit handle");
}
