//! Output formatting tests

use std::collections::BTreeMap;
use std::sync::Arc;

use cadgen::application::domain_services::StrategySelector;
use cadgen::application::use_cases::AssistantResponse;
use cadgen::cli::render::{format_matches, format_response};
use cadgen::domain::entities::{
    Diagnostic, DiagnosticKind, GeneratedArtifact, ReferenceExample,
};
use cadgen::domain::value_objects::{
    ComplexityTier, FeatureToggles, SimilarityMatch, Strategy,
};

fn reference(name: &str) -> Arc<ReferenceExample> {
    Arc::new(ReferenceExample {
        name: name.to_string(),
        description: String::new(),
        script: String::new(),
        complexity: ComplexityTier::Functional,
        category: "kitchenware".to_string(),
        parameters: Vec::new(),
        features: Vec::new(),
        embedding: None,
    })
}

fn artifact() -> GeneratedArtifact {
    let mut parameters = BTreeMap::new();
    parameters.insert("height".to_string(), 100.0);
    parameters.insert("radius".to_string(), 30.5);
    GeneratedArtifact::new(
        "result = 1\n".to_string(),
        Strategy::DirectAdaptation,
        Some("coffee_mug".to_string()),
        parameters,
        FeatureToggles::default(),
        1,
    )
}

#[test]
fn test_matches_show_implied_strategy() {
    let matches = vec![
        SimilarityMatch {
            example: reference("coffee_mug"),
            score: 0.61,
            rank: 1,
        },
        SimilarityMatch {
            example: reference("plant_pot"),
            score: 0.25,
            rank: 2,
        },
    ];
    let text = format_matches(&matches, &StrategySelector::default());
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("0.610") && lines[0].contains("coffee_mug"));
    assert!(lines[0].ends_with("direct adaptation"));
    assert!(lines[1].ends_with("category adaptation"));
}

#[test]
fn test_empty_matches() {
    let text = format_matches(&[], &StrategySelector::default());
    assert!(text.contains("No references"));
}

#[test]
fn test_artifact_response_lists_bound_values() {
    let response = AssistantResponse::Artifact {
        artifact: Box::new(artifact()),
        text: "Here is your mug.".to_string(),
    };
    let text = format_response(&response);
    assert!(text.starts_with("Here is your mug."));
    assert!(text.contains("```python\nresult = 1\n```"));
    assert!(text.contains("height=100"));
    assert!(text.contains("radius=30.5"));
}

#[test]
fn test_error_response_includes_diagnostic() {
    let response = AssistantResponse::Error {
        message: "The script failed.".to_string(),
        diagnostic: Some(Diagnostic::new(
            DiagnosticKind::GeometricDegeneracy,
            "BRep_API: command not done",
        )),
        artifact: None,
    };
    let text = format_response(&response);
    assert!(text.contains("The script failed."));
    assert!(text.contains("BRep_API"));
}
