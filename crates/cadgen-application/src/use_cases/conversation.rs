//! Conversation Engine Use Case
//!
//! The turn function of a session. Each turn runs against a draft copy of
//! the session; the draft replaces the session only when the turn
//! completes, so a cancelled or failed turn leaves no trace.
//!
//! State flow:
//!
//! ```text
//! AwaitingObject -> ElicitingParameters -> ReadyToGenerate -> AwaitingConfirmation -> Generated
//!                        ^                                          |                    |
//!                        +------------------ change ----------------+--------------------+
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use cadgen_domain::constants::{
    DEFAULT_MAX_QUESTIONS, DEFAULT_REPAIR_ATTEMPTS, DEFAULT_TOP_K, FEATURE_LEXICON,
    GENERIC_DIMENSION_DEFAULT, GENERIC_PARAMETERS,
};
use cadgen_domain::entities::{
    ConversationSession, DetectedObject, Diagnostic, GeneratedArtifact, PendingQuestion,
    SessionState, TurnRecord, ValidationResult,
};
use cadgen_domain::error::{Error, Result};
use cadgen_domain::value_objects::{
    FeatureToggles, ParameterRole, ParameterSpec, Strategy, format_value,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain_services::elicitation::{
    self, Ambiguity, ElicitationOutcome, known_features,
};
use crate::domain_services::intent::{
    RegenerationRequest, detect_new_object_label, detect_object_label, is_confirmation,
    is_end_request, regeneration_request, regeneration_strategy,
};
use crate::domain_services::strategy::StrategySelector;
use crate::ports::services::{
    CodeSynthesizerInterface, ScriptValidatorInterface, SimilaritySearchInterface,
    SynthesisRequest,
};

/// Tunables of the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationSettings {
    /// Matches retrieved when detecting the object
    pub top_k: usize,
    /// Questions asked per object before defaults are used
    pub max_questions: usize,
    /// Repair syntheses after a validation failure
    pub repair_attempts: usize,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_questions: DEFAULT_MAX_QUESTIONS,
            repair_attempts: DEFAULT_REPAIR_ATTEMPTS,
        }
    }
}

/// What the assistant says back
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantResponse {
    /// A clarifying question
    Question {
        parameter: Option<String>,
        text: String,
    },
    /// A validated script waiting for confirmation
    Artifact {
        artifact: Box<GeneratedArtifact>,
        text: String,
    },
    /// Plain information, no decision needed
    Message(String),
    /// A surfaced failure, with the best-effort script when there is one
    Error {
        message: String,
        diagnostic: Option<Diagnostic>,
        artifact: Option<Box<GeneratedArtifact>>,
    },
}

impl AssistantResponse {
    pub fn text(&self) -> &str {
        match self {
            Self::Question { text, .. } | Self::Artifact { text, .. } => text,
            Self::Message(text) => text,
            Self::Error { message, .. } => message,
        }
    }

    /// Script carried by the response, if any
    pub fn artifact(&self) -> Option<&GeneratedArtifact> {
        match self {
            Self::Artifact { artifact, .. } => Some(&**artifact),
            Self::Error {
                artifact: Some(artifact),
                ..
            } => Some(&**artifact),
            _ => None,
        }
    }

    fn with_preamble(self, preamble: &str) -> Self {
        match self {
            Self::Question { parameter, text } => Self::Question {
                parameter,
                text: format!("{preamble} {text}"),
            },
            Self::Artifact { artifact, text } => Self::Artifact {
                artifact,
                text: format!("{preamble} {text}"),
            },
            Self::Message(text) => Self::Message(format!("{preamble} {text}")),
            error @ Self::Error { .. } => error,
        }
    }
}

/// Drives sessions through detection, elicitation, synthesis and review
pub struct ConversationEngine {
    search: Arc<dyn SimilaritySearchInterface>,
    selector: StrategySelector,
    synthesizer: Arc<dyn CodeSynthesizerInterface>,
    validator: Arc<dyn ScriptValidatorInterface>,
    settings: ConversationSettings,
}

impl ConversationEngine {
    pub fn new(
        search: Arc<dyn SimilaritySearchInterface>,
        selector: StrategySelector,
        synthesizer: Arc<dyn CodeSynthesizerInterface>,
        validator: Arc<dyn ScriptValidatorInterface>,
    ) -> Self {
        Self {
            search,
            selector,
            synthesizer,
            validator,
            settings: ConversationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ConversationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn selector(&self) -> &StrategySelector {
        &self.selector
    }

    /// Process one user utterance
    pub async fn advance(
        &self,
        session: &mut ConversationSession,
        utterance: &str,
    ) -> Result<AssistantResponse> {
        self.advance_with_cancel(session, utterance, &CancellationToken::new())
            .await
    }

    /// Process one user utterance, giving up when `cancel` fires
    ///
    /// On cancellation or error the session is left exactly as it was.
    pub async fn advance_with_cancel(
        &self,
        session: &mut ConversationSession,
        utterance: &str,
        cancel: &CancellationToken,
    ) -> Result<AssistantResponse> {
        if session.is_ended() {
            return Err(Error::SessionEnded);
        }

        let mut draft = session.clone();
        let (question, parameter) = match &draft.state {
            SessionState::ElicitingParameters {
                pending: Some(pending),
            } => (Some(pending.text.clone()), Some(pending.parameter.clone())),
            _ => (None, None),
        };

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                info!(session = %session.session_id, "Turn cancelled");
                return Err(Error::Cancelled);
            }
            result = self.turn(&mut draft, utterance) => result?,
        };

        draft.turn_history.push(TurnRecord {
            question,
            parameter,
            answer: utterance.to_string(),
        });
        debug!(
            session = %draft.session_id,
            from = session.state.name(),
            to = draft.state.name(),
            "Turn complete"
        );
        *session = draft;
        Ok(response)
    }

    async fn turn(&self, s: &mut ConversationSession, utterance: &str) -> Result<AssistantResponse> {
        if is_end_request(utterance) {
            s.state = SessionState::SessionEnded;
            return Ok(AssistantResponse::Message("Goodbye!".to_string()));
        }

        match std::mem::replace(&mut s.state, SessionState::AwaitingObject) {
            SessionState::AwaitingObject => self.detect_object(s, utterance).await,
            SessionState::ElicitingParameters { pending } => {
                self.elicit(s, utterance, pending).await
            }
            SessionState::ReadyToGenerate => {
                if let Some(label) = new_object_request(s, utterance) {
                    info!(object = %label, "New object requested");
                    s.reset_for_new_object();
                    return self.detect_object(s, utterance).await;
                }
                if let Some(request) = regeneration_request(utterance) {
                    self.switch_strategy(s, request);
                }
                self.elicit(s, utterance, None).await
            }
            SessionState::AwaitingConfirmation { artifact } => {
                self.review(s, utterance, artifact, false).await
            }
            SessionState::Generated { artifact } => self.review(s, utterance, artifact, true).await,
            SessionState::SessionEnded => Err(Error::SessionEnded),
        }
    }

    // ------------------------------------------------------------------
    // Detection
    // ------------------------------------------------------------------

    async fn detect_object(
        &self,
        s: &mut ConversationSession,
        utterance: &str,
    ) -> Result<AssistantResponse> {
        let matches = self.search.search(utterance, self.settings.top_k).await?;
        let best = matches.first();
        let strategy = best.map_or(Strategy::IntelligentReasoning, |m| {
            self.selector.select(m.score)
        });
        let reference = best
            .filter(|_| strategy.uses_reference())
            .map(|m| Arc::clone(&m.example));

        let label = detect_object_label(utterance)
            .or_else(|| reference.as_ref().map(|r| r.name.replace('_', " ")))
            .unwrap_or_else(|| "object".to_string());

        let (specs, features) = match &reference {
            Some(example) => (example.parameters.clone(), example.features.clone()),
            None => (generic_parameters(), Vec::new()),
        };

        info!(
            session = %s.session_id,
            object = %label,
            reference = reference.as_ref().map(|r| r.name.as_str()),
            score = best.map(|m| m.score),
            %strategy,
            "Object detected"
        );

        s.detected_object = Some(DetectedObject {
            label: label.clone(),
            reference: reference.clone(),
            score: best.map_or(0.0, |m| m.score),
        });
        s.retrieved_matches = matches;
        s.strategy = Some(strategy);
        s.feature_toggles = FeatureToggles::from_defaults(&features);
        s.parameter_specs = specs;
        s.feature_specs = features;
        s.collected_parameters.clear();
        s.questions_asked = 0;

        let preamble = match &reference {
            Some(example) => format!(
                "Let's make a {label}, using {strategy} of '{}'.",
                example.name
            ),
            None => format!("Let's design a {label} from scratch."),
        };
        let response = self.elicit(s, utterance, None).await?;
        Ok(response.with_preamble(&preamble))
    }

    // ------------------------------------------------------------------
    // Elicitation
    // ------------------------------------------------------------------

    async fn elicit(
        &self,
        s: &mut ConversationSession,
        utterance: &str,
        pending: Option<PendingQuestion>,
    ) -> Result<AssistantResponse> {
        let pending_name = pending.as_ref().map(|p| p.parameter.as_str());
        let outcome = parse(s, utterance, pending_name);
        apply_outcome(s, &outcome);

        let ambiguous = |name: &str| {
            outcome
                .ambiguity
                .as_ref()
                .is_some_and(|ambiguity| ambiguity.parameter == name)
        };
        if let Some(pending) = &pending
            && !s.collected_parameters.contains_key(&pending.parameter)
            && !outcome.change_requests.contains(&pending.parameter)
            && !ambiguous(&pending.parameter)
            && let Some(spec) = s.parameter_specs.iter().find(|p| p.name == pending.parameter)
        {
            debug!(parameter = %spec.name, default = spec.default, "No value given, using default");
            s.collected_parameters
                .insert(spec.name.clone(), spec.default);
        }

        if let Some(ambiguity) = outcome.ambiguity {
            return Ok(ask_to_disambiguate(s, ambiguity));
        }
        self.next_step(s, &outcome.change_requests, None).await
    }

    /// Ask the next question, or generate once nothing is missing
    async fn next_step(
        &self,
        s: &mut ConversationSession,
        changed: &[String],
        prior_script: Option<String>,
    ) -> Result<AssistantResponse> {
        let enabled = |spec: &ParameterSpec| {
            spec.feature
                .as_ref()
                .is_none_or(|feature| s.feature_toggles.is_enabled(feature))
        };
        let missing = |spec: &&ParameterSpec| {
            !s.collected_parameters.contains_key(&spec.name) && enabled(*spec)
        };

        let requested = s
            .parameter_specs
            .iter()
            .filter(|spec| changed.contains(&spec.name))
            .find(missing);
        let next = requested.or_else(|| {
            (s.questions_asked < self.settings.max_questions)
                .then(|| {
                    s.parameter_specs
                        .iter()
                        .filter(|spec| spec.required)
                        .find(missing)
                })
                .flatten()
        });

        if let Some(spec) = next.cloned() {
            let text = question_text(&spec, object_label(s));
            s.questions_asked += 1;
            s.state = SessionState::ElicitingParameters {
                pending: Some(PendingQuestion {
                    parameter: spec.name.clone(),
                    text: text.clone(),
                }),
            };
            return Ok(AssistantResponse::Question {
                parameter: Some(spec.name),
                text,
            });
        }

        let defaults: Vec<(String, f64)> = s
            .parameter_specs
            .iter()
            .filter(|spec| spec.required && missing(spec))
            .map(|spec| (spec.name.clone(), spec.default))
            .collect();
        if !defaults.is_empty() {
            info!(count = defaults.len(), "Question limit reached, using defaults");
        }
        s.collected_parameters.extend(defaults);
        s.state = SessionState::ReadyToGenerate;
        self.generate(s, prior_script).await
    }

    // ------------------------------------------------------------------
    // Synthesis and validation
    // ------------------------------------------------------------------

    async fn generate(
        &self,
        s: &mut ConversationSession,
        prior_script: Option<String>,
    ) -> Result<AssistantResponse> {
        let strategy = s.strategy.unwrap_or(Strategy::IntelligentReasoning);
        let label = object_label(s).to_string();
        let supporting = if strategy == Strategy::PatternCombination {
            s.retrieved_matches
                .iter()
                .skip(1)
                .filter(|m| m.score >= self.selector.floor())
                .map(|m| Arc::clone(&m.example))
                .collect()
        } else {
            Vec::new()
        };
        let mut request = SynthesisRequest {
            strategy,
            object_label: label.clone(),
            reference: s.reference().cloned(),
            supporting,
            parameters: effective_parameters(s),
            toggles: s.feature_toggles.clone(),
            prior_script,
            repair: None,
        };

        let mut artifact = match self.synthesizer.synthesize(&request).await {
            Ok(artifact) => artifact,
            Err(e @ Error::SynthesisFailed { .. }) => {
                s.state = SessionState::ReadyToGenerate;
                return Ok(AssistantResponse::Error {
                    message: format!(
                        "{e}. Say 'try again', change a parameter, or ask for a different approach."
                    ),
                    diagnostic: None,
                    artifact: None,
                });
            }
            Err(e) => return Err(e),
        };

        let mut result = self.validator.validate(&artifact).await?;
        for repair in 1..=self.settings.repair_attempts {
            let Some(diagnostic) = result.diagnostic().cloned() else {
                break;
            };
            warn!(repair, %diagnostic, "Validation failed, requesting repair");
            request.prior_script = Some(artifact.script_text.clone());
            request.repair = Some(diagnostic);
            match self.synthesizer.synthesize(&request).await {
                Ok(repaired) => {
                    artifact = repaired;
                    result = self.validator.validate(&artifact).await?;
                }
                Err(Error::SynthesisFailed { diagnostic, .. }) => {
                    warn!(repair, %diagnostic, "Repair synthesis failed");
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        artifact.validation = Some(result.clone());

        Ok(match result {
            ValidationResult::Passed => {
                s.state = SessionState::AwaitingConfirmation {
                    artifact: Box::new(artifact.clone()),
                };
                AssistantResponse::Artifact {
                    text: format!(
                        "Here is your {label} ({strategy}). Reply 'yes' to accept it, or tell me what to change."
                    ),
                    artifact: Box::new(artifact),
                }
            }
            ValidationResult::Failed(diagnostic) => {
                // A script that failed validation is never offered for acceptance
                s.state = SessionState::ReadyToGenerate;
                let failure = Error::ValidationFailed {
                    diagnostic: diagnostic.clone(),
                    script: artifact.script_text.clone(),
                };
                AssistantResponse::Error {
                    message: format!(
                        "{failure}. The best-effort script is attached; change a parameter or ask me to try again."
                    ),
                    diagnostic: Some(diagnostic),
                    artifact: Some(Box::new(artifact)),
                }
            }
        })
    }

    // ------------------------------------------------------------------
    // Review
    // ------------------------------------------------------------------

    /// Handle a reply to a presented script; `accepted` once the user confirmed it
    async fn review(
        &self,
        s: &mut ConversationSession,
        utterance: &str,
        artifact: Box<GeneratedArtifact>,
        accepted: bool,
    ) -> Result<AssistantResponse> {
        if let Some(label) = new_object_request(s, utterance) {
            info!(object = %label, "New object requested");
            s.reset_for_new_object();
            return self.detect_object(s, utterance).await;
        }

        if let Some(request) = regeneration_request(utterance) {
            self.switch_strategy(s, request);
            return self.generate(s, None).await;
        }

        let outcome = parse(s, utterance, None);
        if !outcome.is_empty() {
            apply_outcome(s, &outcome);
            if let Some(ambiguity) = outcome.ambiguity {
                return Ok(ask_to_disambiguate(s, ambiguity));
            }
            if !outcome.change_requests.is_empty() {
                return self.next_step(s, &outcome.change_requests, None).await;
            }
            return self
                .next_step(s, &[], Some(artifact.script_text.clone()))
                .await;
        }

        if accepted {
            s.state = SessionState::Generated { artifact };
            return Ok(AssistantResponse::Message(format!(
                "The {} script is final. Describe another object to start something new.",
                object_label(s)
            )));
        }
        if is_confirmation(utterance) {
            info!(session = %s.session_id, artifact = %artifact.id, "Script accepted");
            s.state = SessionState::Generated { artifact };
            return Ok(AssistantResponse::Message(
                "Great, the script is final.".to_string(),
            ));
        }

        s.state = SessionState::AwaitingConfirmation { artifact };
        Ok(AssistantResponse::Message(
            "Reply 'yes' to accept the script, tell me what to change, or ask me to regenerate it."
                .to_string(),
        ))
    }

    fn switch_strategy(&self, s: &mut ConversationSession, request: RegenerationRequest) {
        let current = s.strategy.unwrap_or(Strategy::IntelligentReasoning);
        let next = regeneration_strategy(current, request);
        if next == current {
            info!(strategy = %current, "Regenerating with the same strategy");
        } else {
            info!(from = %current, to = %next, "Regenerating with another strategy");
        }
        s.strategy = Some(next);
        // Reference strategies take the best retrieved match
        if next.uses_reference()
            && s.reference().is_none()
            && let Some(best) = s.retrieved_matches.first()
            && let Some(object) = s.detected_object.as_mut()
        {
            object.reference = Some(Arc::clone(&best.example));
        }
    }
}

fn parse(s: &ConversationSession, utterance: &str, pending: Option<&str>) -> ElicitationOutcome {
    let features = known_features(&s.feature_specs);
    elicitation::extract(utterance, &s.parameter_specs, &features, pending)
}

/// Re-ask a parameter that received several values; the rest of the
/// utterance has already been applied
fn ask_to_disambiguate(s: &mut ConversationSession, ambiguity: Ambiguity) -> AssistantResponse {
    let values: Vec<String> = ambiguity
        .candidates
        .iter()
        .map(|v| format_value(*v))
        .collect();
    let text = format!(
        "I found more than one value for {}: {}. Which one did you mean?",
        ambiguity.parameter.replace('_', " "),
        values.join(" or ")
    );
    let parameter = ambiguity.parameter.clone();
    info!(error = %Error::from(ambiguity), "Ambiguous parameter, asking again");
    s.state = SessionState::ElicitingParameters {
        pending: Some(PendingQuestion {
            parameter: parameter.clone(),
            text: text.clone(),
        }),
    };
    AssistantResponse::Question {
        parameter: Some(parameter),
        text,
    }
}

fn apply_outcome(s: &mut ConversationSession, outcome: &ElicitationOutcome) {
    for (name, value) in &outcome.values {
        s.collected_parameters.insert(name.clone(), *value);
    }
    for (feature, enabled) in &outcome.toggles {
        s.feature_toggles.set(feature.clone(), *enabled);
    }
    for name in &outcome.change_requests {
        s.collected_parameters.remove(name);
    }
}

/// Values bound during synthesis: defaults of enabled parameters overlaid
/// with what the user supplied
fn effective_parameters(s: &ConversationSession) -> BTreeMap<String, f64> {
    let gated_off = |spec: &ParameterSpec| {
        spec.feature
            .as_ref()
            .is_some_and(|feature| !s.feature_toggles.is_enabled(feature))
    };
    let mut parameters: BTreeMap<String, f64> = s
        .parameter_specs
        .iter()
        .filter(|spec| !gated_off(spec))
        .map(|spec| (spec.name.clone(), spec.default))
        .collect();
    for (name, value) in &s.collected_parameters {
        let disabled = s
            .parameter_specs
            .iter()
            .find(|spec| &spec.name == name)
            .is_some_and(gated_off);
        if !disabled {
            parameters.insert(name.clone(), *value);
        }
    }
    parameters
}

fn generic_parameters() -> Vec<ParameterSpec> {
    GENERIC_PARAMETERS
        .iter()
        .map(|name| ParameterSpec::new(*name, GENERIC_DIMENSION_DEFAULT))
        .collect()
}

fn object_label(s: &ConversationSession) -> &str {
    s.detected_object
        .as_ref()
        .map_or("object", |object| object.label.as_str())
}

fn question_text(spec: &ParameterSpec, object: &str) -> String {
    let name = spec.display_name();
    let default = format_value(spec.default);
    match spec.role {
        ParameterRole::Count => format!("How many {name} should the {object} have? (default {default})"),
        ParameterRole::Angle => format!("What {name} in degrees? (default {default})"),
        role if role.is_dimensional() => {
            format!("What {name} should the {object} have, in mm? (default {default})")
        }
        _ => format!("What value should {name} take? (default {default})"),
    }
}

/// Label of a different object the user asks for, if any
///
/// Only "a/an/another <noun>" counts, so "make the base thicker" stays a
/// change. Parameter words and feature words ("I want a handle") are not
/// objects.
fn new_object_request(s: &ConversationSession, utterance: &str) -> Option<String> {
    let label = detect_new_object_label(utterance)?;
    if s
        .detected_object
        .as_ref()
        .is_some_and(|object| object.label == label)
    {
        return None;
    }
    let is_parameter_word = s.parameter_specs.iter().any(|spec| {
        spec.name.split('_').any(|token| token == label)
            || spec.role.aliases().contains(&label.as_str())
    });
    let is_feature_word = FEATURE_LEXICON.iter().any(|(name, root)| {
        label == *name || label.strip_suffix('s').unwrap_or(&label) == *root
    });
    let is_role_word = [
        ParameterRole::Radius,
        ParameterRole::Diameter,
        ParameterRole::Height,
        ParameterRole::Width,
        ParameterRole::Depth,
        ParameterRole::Length,
        ParameterRole::Thickness,
    ]
    .iter()
    .any(|role| role.aliases().contains(&label.as_str()));
    (!is_parameter_word && !is_feature_word && !is_role_word).then_some(label)
}
