//! Unit tests for domain error types

use std::time::Duration;

use cadgen_domain::Error;
use cadgen_domain::entities::{Diagnostic, DiagnosticKind};

#[test]
fn test_duplicate_reference_error() {
    let error = Error::duplicate_reference("mug");
    match &error {
        Error::DuplicateReferenceName { name } => assert_eq!(name, "mug"),
        _ => panic!("Expected DuplicateReferenceName error"),
    }
    assert!(error.to_string().contains("mug"));
}

#[test]
fn test_retryable_kinds() {
    assert!(Error::embedding_unavailable("down").is_retryable());
    assert!(Error::generation("502").is_retryable());
    assert!(Error::timeout("generation", Duration::from_secs(1)).is_retryable());

    assert!(!Error::duplicate_reference("mug").is_retryable());
    assert!(!Error::Cancelled.is_retryable());
    assert!(
        !Error::SynthesisFailed {
            attempts: 3,
            diagnostic: "no script".to_string()
        }
        .is_retryable()
    );
}

#[test]
fn test_ambiguous_parameter_display() {
    let error = Error::AmbiguousParameter {
        parameter: "height".to_string(),
        candidates: vec![100.0, 120.0],
    };
    let text = error.to_string();
    assert!(text.contains("height"));
    assert!(text.contains("100"));
    assert!(text.contains("120"));
}

#[test]
fn test_validation_failed_carries_diagnostic() {
    let diagnostic = Diagnostic::new(DiagnosticKind::InvalidDimension, "radius must be positive")
        .with_construct("radius")
        .with_line(4);
    let error = Error::ValidationFailed {
        diagnostic,
        script: "result = None".to_string(),
    };
    let text = error.to_string();
    assert!(text.contains("invalid dimension"));
    assert!(text.contains("(radius)"));
    assert!(text.contains("line 4"));
}

#[test]
fn test_io_error_from_std() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let error: Error = io.into();
    assert!(matches!(error, Error::IoSimple { .. }));
}
