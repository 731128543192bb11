//! Tests for script transforms and prompt assembly

use std::collections::BTreeMap;
use std::sync::Arc;

use cadgen_application::domain_services::PromptBuilder;
use cadgen_application::domain_services::prompt::truncate_lines;
use cadgen_application::domain_services::script::{
    assigns_result, bind_parameters, derive_parameter_specs, detect_features, extract_parameters,
    extract_script, looks_like_script, mentions_feature, strip_feature,
};
use cadgen_application::ports::services::SynthesisRequest;
use cadgen_domain::entities::{Diagnostic, DiagnosticKind, ReferenceExample};
use cadgen_domain::value_objects::{
    ComplexityTier, FeatureToggles, GenerationBudget, PerformanceMode, Strategy,
};

use crate::support::{BOX_SCRIPT, MUG_SCRIPT};

// ============================================================================
// Extraction
// ============================================================================

#[test]
fn test_extract_prefers_fenced_block() {
    let raw = "Sure! Here you go:\n```python\nimport cadquery as cq\nresult = cq.Workplane().box(1, 1, 1)\n```\nThis code creates a cube.";
    let script = extract_script(raw);
    assert!(script.starts_with("import cadquery as cq"));
    assert!(!script.contains("This code"));
    assert!(!script.contains("```"));
}

#[test]
fn test_extract_without_fence_cuts_prose() {
    let raw = "Here is the model.\nimport cadquery as cq\nwidth = 10\nresult = cq.Workplane().box(width, width, width)\nThis code makes a cube of side 10.";
    let script = extract_script(raw);
    assert!(script.starts_with("import cadquery"));
    assert!(script.ends_with("box(width, width, width)"));
}

#[test]
fn test_script_heuristics() {
    assert!(looks_like_script(BOX_SCRIPT));
    assert!(!looks_like_script("I cannot help with that."));
    assert!(assigns_result(BOX_SCRIPT));
    assert!(!assigns_result("if result == 3:\n    pass\n"));
}

// ============================================================================
// Parameters and features
// ============================================================================

#[test]
fn test_extract_parameters_in_declaration_order() {
    let parameters = extract_parameters(MUG_SCRIPT);
    let names: Vec<&str> = parameters.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        ["radius", "height", "wall_thickness", "handle_width", "handle_height"]
    );
    assert_eq!(parameters[0].1, 40.0);
}

#[test]
fn test_detect_features_and_gating() {
    let features = detect_features(MUG_SCRIPT);
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].name, "handle");
    assert!(detect_features(BOX_SCRIPT).is_empty());

    let specs = derive_parameter_specs(MUG_SCRIPT, &features);
    let handle_width = specs.iter().find(|s| s.name == "handle_width").unwrap();
    assert_eq!(handle_width.feature.as_deref(), Some("handle"));
    assert!(!handle_width.required);
    let radius = specs.iter().find(|s| s.name == "radius").unwrap();
    assert!(radius.required);
    assert!(radius.feature.is_none());
}

#[test]
fn test_bind_rewrites_and_inserts() {
    let mut values = BTreeMap::new();
    values.insert("height".to_string(), 100.0);
    values.insert("fillet_radius".to_string(), 2.5);
    let bound = bind_parameters(BOX_SCRIPT, &values);

    assert!(bound.contains("height = 100\n"));
    assert!(!bound.contains("height = 20"));
    assert!(bound.contains("fillet_radius = 2.5"));
    let insert = bound.find("fillet_radius").unwrap();
    assert!(insert > bound.find("import cadquery").unwrap());
    assert!(insert < bound.find("result =").unwrap());
}

#[test]
fn test_strip_feature_removes_all_handle_code() {
    let stripped = strip_feature(MUG_SCRIPT, "handle");
    assert!(!mentions_feature(&stripped, "handle"));
    assert!(!stripped.to_lowercase().contains("handle"));
    assert!(stripped.contains("result = cup"));
    assert!(stripped.contains("wall_thickness = 3"));
}

#[test]
fn test_strip_feature_fills_emptied_blocks() {
    let script = "import cadquery as cq\nresult = cq.Workplane().box(10, 10, 10)\nif True:\n    hole_depth = 3\n    result = result.faces(\">Z\").hole(hole_depth)\n";
    let stripped = strip_feature(script, "hole");
    assert!(stripped.contains("if True:\n    pass"));
    assert!(!stripped.contains("hole_depth"));
}

#[test]
fn test_strip_unmentioned_feature_is_identity() {
    assert_eq!(strip_feature(BOX_SCRIPT, "lid").trim(), BOX_SCRIPT.trim());
}

// ============================================================================
// Prompt assembly
// ============================================================================

fn mug_reference() -> Arc<ReferenceExample> {
    let features = detect_features(MUG_SCRIPT);
    Arc::new(ReferenceExample {
        name: "coffee_mug".to_string(),
        description: "Cylindrical cup with a side handle".to_string(),
        script: MUG_SCRIPT.to_string(),
        complexity: ComplexityTier::Functional,
        category: "kitchenware".to_string(),
        parameters: derive_parameter_specs(MUG_SCRIPT, &features),
        features,
        embedding: None,
    })
}

fn request(strategy: Strategy) -> SynthesisRequest {
    let mut parameters = BTreeMap::new();
    parameters.insert("height".to_string(), 100.0);
    let mut toggles = FeatureToggles::default();
    toggles.set("handle", false);
    SynthesisRequest {
        strategy,
        object_label: "mug".to_string(),
        reference: Some(mug_reference()),
        supporting: Vec::new(),
        parameters,
        toggles,
        prior_script: None,
        repair: None,
    }
}

#[test]
fn test_prompt_carries_parameters_toggles_and_reference() {
    let prompt = PromptBuilder::new(PerformanceMode::Balanced.budget())
        .build(&request(Strategy::DirectAdaptation), None);
    assert!(prompt.contains("height = 100"));
    assert!(prompt.contains("handle"));
    assert!(prompt.contains("```python\nimport cadquery as cq"));
    assert!(prompt.contains("Reference script 'coffee_mug'"));
}

#[test]
fn test_prompt_without_reference_for_intelligent_reasoning() {
    let prompt = PromptBuilder::new(PerformanceMode::Balanced.budget())
        .build(&request(Strategy::IntelligentReasoning), None);
    assert!(!prompt.contains("```python"));
    assert!(prompt.contains("first principles"));
}

#[test]
fn test_prompt_includes_fix_and_repair() {
    let mut repair_request = request(Strategy::DirectAdaptation);
    repair_request.repair = Some(
        Diagnostic::new(DiagnosticKind::UndefinedParameter, "name 'r' is not defined")
            .with_construct("r"),
    );
    let prompt = PromptBuilder::new(PerformanceMode::Fast.budget())
        .build(&repair_request, Some("the script does not parse"));
    assert!(prompt.contains("undefined parameter"));
    assert!(prompt.ends_with("Fix this and answer with the corrected script only."));
}

#[test]
fn test_prompt_respects_budget() {
    let budget = GenerationBudget {
        context_window: 400,
        ..PerformanceMode::Fast.budget()
    };
    let builder = PromptBuilder::new(budget);
    let mut big = request(Strategy::DirectAdaptation);
    let long_script = format!("import cadquery as cq\n{}", "x = 1\n".repeat(2000));
    big.reference = Some(Arc::new(ReferenceExample {
        script: long_script,
        ..(*mug_reference()).clone()
    }));
    let prompt = builder.build(&big, None);
    assert!(prompt.len() <= builder.char_budget());
    assert!(prompt.contains("# ... (truncated)"));
}

#[test]
fn test_truncate_lines_keeps_whole_lines() {
    let truncated = truncate_lines("aaaa\nbbbb\ncccc\n", 10);
    assert_eq!(truncated, "aaaa\nbbbb\n# ... (truncated)");
    assert_eq!(truncate_lines("short", 10), "short");
}
