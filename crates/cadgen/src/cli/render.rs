//! Text rendering of engine output

use std::fmt::Write;

use cadgen_application::domain_services::StrategySelector;
use cadgen_application::use_cases::{AssistantResponse, IndexReport};
use cadgen_domain::value_objects::{SimilarityMatch, format_value};

/// One line per match: rank, score, name, tier and implied strategy
pub fn format_matches(matches: &[SimilarityMatch], selector: &StrategySelector) -> String {
    if matches.is_empty() {
        return "No references indexed.\n".to_string();
    }
    let mut out = String::new();
    for m in matches {
        let _ = writeln!(
            out,
            "{:>2}. {:.3}  {:<28} {:<13} -> {}",
            m.rank,
            m.score,
            m.example.name,
            m.example.complexity.as_str(),
            selector.select(m.score)
        );
    }
    out
}

pub fn format_report(report: &IndexReport) -> String {
    format!(
        "Indexed {} reference(s), {} embedding(s) computed",
        report.indexed, report.computed
    )
}

/// What the chat prints for a response
pub fn format_response(response: &AssistantResponse) -> String {
    match response {
        AssistantResponse::Question { text, .. } | AssistantResponse::Message(text) => {
            text.clone()
        }
        AssistantResponse::Artifact { artifact, text } => {
            let mut out = format!("{text}\n\n```python\n{}```", artifact.script_text);
            if !artifact.parameters_used.is_empty() {
                let values: Vec<String> = artifact
                    .parameters_used
                    .iter()
                    .map(|(name, value)| format!("{name}={}", format_value(*value)))
                    .collect();
                let _ = write!(out, "\n[{}; {}]", artifact.source_strategy, values.join(", "));
            }
            out
        }
        AssistantResponse::Error {
            message,
            diagnostic,
            artifact,
        } => {
            let mut out = message.clone();
            if let Some(diagnostic) = diagnostic {
                let _ = write!(out, "\n  {diagnostic}");
            }
            if let Some(artifact) = artifact {
                let _ = write!(out, "\n\n```python\n{}```", artifact.script_text);
            }
            out
        }
    }
}
