//! Generation prompt assembly
//!
//! Turns a [`SynthesisRequest`] into instruction text for the generative
//! collaborator. The prompt is kept within a fraction of the model's
//! context window; reference scripts are truncated at line boundaries when
//! they do not fit.

use cadgen_domain::constants::{CHARS_PER_TOKEN, PROMPT_CONTEXT_FRACTION, SCRIPT_RESULT_VARIABLE};
use cadgen_domain::entities::{Diagnostic, ReferenceExample};
use cadgen_domain::value_objects::{GenerationBudget, Strategy, format_value};

use crate::ports::services::SynthesisRequest;

const TRUNCATION_MARK: &str = "# ... (truncated)";

/// Builds prompts that fit a generation budget
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    budget: GenerationBudget,
}

impl PromptBuilder {
    pub fn new(budget: GenerationBudget) -> Self {
        Self { budget }
    }

    /// Characters the prompt may use
    pub fn char_budget(&self) -> usize {
        (self.budget.context_window as f64 * CHARS_PER_TOKEN as f64 * PROMPT_CONTEXT_FRACTION)
            as usize
    }

    /// Full prompt for one attempt; `fix` carries the failure of the previous attempt
    pub fn build(&self, request: &SynthesisRequest, fix: Option<&str>) -> String {
        let mut head = vec![strategy_instructions(request.strategy, &request.object_label)];
        head.push(common_rules());
        if let Some(section) = parameter_section(request) {
            head.push(section);
        }
        if let Some(section) = toggle_section(request) {
            head.push(section);
        }

        let mut tail = Vec::new();
        if let Some(diagnostic) = &request.repair {
            tail.push(repair_section(diagnostic));
        }
        if let Some(problem) = fix {
            tail.push(format!(
                "The previous answer was rejected: {problem}\nFix this and answer with the corrected script only."
            ));
        }

        // Scripts go last in priority: they are the only part that gets cut
        let fixed_len: usize = head.iter().chain(tail.iter()).map(|s| s.len() + 2).sum();
        let mut remaining = self.char_budget().saturating_sub(fixed_len);

        let mut scripts = Vec::new();
        if let Some(prior) = &request.prior_script {
            let block = script_block("Current script to modify", prior, remaining);
            remaining = remaining.saturating_sub(block.len() + 2);
            scripts.push(block);
        }
        if request.strategy.uses_reference() {
            if let Some(reference) = &request.reference {
                let block = reference_block(request.strategy, reference, remaining);
                remaining = remaining.saturating_sub(block.len() + 2);
                scripts.push(block);
            }
            if request.strategy == Strategy::PatternCombination {
                for supporting in &request.supporting {
                    if remaining < 200 {
                        break;
                    }
                    let block = script_block(
                        &format!("Additional pattern source '{}'", supporting.name),
                        &supporting.script,
                        remaining,
                    );
                    remaining = remaining.saturating_sub(block.len() + 2);
                    scripts.push(block);
                }
            }
        }

        head.into_iter()
            .chain(scripts)
            .chain(tail)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn strategy_instructions(strategy: Strategy, object: &str) -> String {
    match strategy {
        Strategy::DirectAdaptation => format!(
            "Adapt the reference script below to model a {object}. Keep its structure; \
             change only parameter values and add or remove the listed optional features."
        ),
        Strategy::PatternCombination => format!(
            "Write a script for a {object} reusing the structural patterns of the scripts below. \
             You may combine techniques from several of them."
        ),
        Strategy::CategoryAdaptation => format!(
            "Write a script for a {object}. The script below belongs to the same category and \
             complexity; treat it only as a loose starting point."
        ),
        Strategy::IntelligentReasoning => format!(
            "Design a script for a {object} from first principles: choose simple solids, \
             sensible proportions and robust operations."
        ),
    }
}

fn common_rules() -> String {
    format!(
        "Rules:\n\
         - Use CadQuery (`import cadquery as cq`).\n\
         - Declare every dimension as a top-level variable `name = value` in millimetres.\n\
         - Assign the final solid to a variable named `{SCRIPT_RESULT_VARIABLE}`.\n\
         - Answer with Python code only, no explanation."
    )
}

fn parameter_section(request: &SynthesisRequest) -> Option<String> {
    if request.parameters.is_empty() {
        return None;
    }
    let lines: Vec<String> = request
        .parameters
        .iter()
        .map(|(name, value)| format!("{name} = {}", format_value(*value)))
        .collect();
    Some(format!("Parameters (use these exact values):\n{}", lines.join("\n")))
}

fn toggle_section(request: &SynthesisRequest) -> Option<String> {
    let directives = request.toggles.directives();
    if directives.is_empty() {
        return None;
    }
    let lines: Vec<String> = directives.iter().map(|d| format!("- {d}")).collect();
    Some(format!("Features:\n{}", lines.join("\n")))
}

fn repair_section(diagnostic: &Diagnostic) -> String {
    format!(
        "Running the previous script failed with {diagnostic}.\nRepair the script so it runs and produces `{SCRIPT_RESULT_VARIABLE}`."
    )
}

fn reference_block(strategy: Strategy, reference: &ReferenceExample, limit: usize) -> String {
    let title = match strategy {
        Strategy::CategoryAdaptation => format!(
            "Starting point '{}' ({}, {})",
            reference.name, reference.category, reference.complexity
        ),
        _ => format!("Reference script '{}': {}", reference.name, reference.description),
    };
    script_block(&title, &reference.script, limit)
}

fn script_block(title: &str, script: &str, limit: usize) -> String {
    let overhead = title.len() + "\n```python\n\n```".len() + TRUNCATION_MARK.len() + 1;
    let body = truncate_lines(script, limit.saturating_sub(overhead));
    format!("{title}\n```python\n{body}\n```")
}

/// Whole lines of `script` that fit in `limit` characters
pub fn truncate_lines(script: &str, limit: usize) -> String {
    if script.len() <= limit {
        return script.to_string();
    }
    let mut kept = String::new();
    for line in script.lines() {
        if kept.len() + line.len() + 1 > limit {
            break;
        }
        kept.push_str(line);
        kept.push('\n');
    }
    kept.push_str(TRUNCATION_MARK);
    kept
}
