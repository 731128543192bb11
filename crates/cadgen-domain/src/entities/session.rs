//! Conversation sessions
//!
//! A session is owned by exactly one conversation and mutated only by the
//! turn function. The state is a tagged variant; data that survives across
//! states (collected parameters, toggles, history) lives beside it.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::artifact::GeneratedArtifact;
use super::reference::ReferenceExample;
use crate::value_objects::{FeatureSpec, FeatureToggles, ParameterSpec, SimilarityMatch, Strategy};

/// Where a session is in the conversation
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Waiting for the user to say what they want
    AwaitingObject,
    /// Collecting parameter values, one question per turn
    ElicitingParameters {
        /// Question asked on the previous turn
        pending: Option<PendingQuestion>,
    },
    /// Every required parameter has a value
    ReadyToGenerate,
    /// A script was produced and waits for the user's verdict
    AwaitingConfirmation { artifact: Box<GeneratedArtifact> },
    /// The user accepted the script
    Generated { artifact: Box<GeneratedArtifact> },
    /// No further turns are accepted
    SessionEnded,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwaitingObject => "awaiting_object",
            Self::ElicitingParameters { .. } => "eliciting_parameters",
            Self::ReadyToGenerate => "ready_to_generate",
            Self::AwaitingConfirmation { .. } => "awaiting_confirmation",
            Self::Generated { .. } => "generated",
            Self::SessionEnded => "session_ended",
        }
    }
}

/// Question waiting for an answer
#[derive(Debug, Clone, PartialEq)]
pub struct PendingQuestion {
    /// Parameter the question is about
    pub parameter: String,
    /// Text shown to the user
    pub text: String,
}

/// Object the session is about
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedObject {
    /// Noun the user used ("cup")
    pub label: String,
    /// Reference trusted for generation, absent under intelligent reasoning
    pub reference: Option<Arc<ReferenceExample>>,
    /// Best similarity score of the detection query
    pub score: f64,
}

/// One exchange of the conversation
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    /// Question the user was answering, if any
    pub question: Option<String>,
    /// Parameter that question was about
    pub parameter: Option<String>,
    /// What the user said
    pub answer: String,
}

/// Entity: state of one conversation
#[derive(Debug, Clone)]
pub struct ConversationSession {
    pub session_id: Uuid,
    pub state: SessionState,
    pub detected_object: Option<DetectedObject>,
    /// Matches of the most recent retrieval query
    pub retrieved_matches: Vec<SimilarityMatch>,
    pub strategy: Option<Strategy>,
    /// Parameters of the detected object in question order
    pub parameter_specs: Vec<ParameterSpec>,
    /// Optional features of the detected object
    pub feature_specs: Vec<FeatureSpec>,
    /// Values supplied by the user or accepted as defaults
    pub collected_parameters: BTreeMap<String, f64>,
    pub feature_toggles: FeatureToggles,
    pub turn_history: Vec<TurnRecord>,
    /// Elicitation questions asked for the current object
    pub questions_asked: usize,
    pub created_at: DateTime<Utc>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            state: SessionState::AwaitingObject,
            detected_object: None,
            retrieved_matches: Vec::new(),
            strategy: None,
            parameter_specs: Vec::new(),
            feature_specs: Vec::new(),
            collected_parameters: BTreeMap::new(),
            feature_toggles: FeatureToggles::default(),
            turn_history: Vec::new(),
            questions_asked: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.state, SessionState::SessionEnded)
    }

    /// Forget the current object but keep the history
    pub fn reset_for_new_object(&mut self) {
        self.state = SessionState::AwaitingObject;
        self.detected_object = None;
        self.retrieved_matches.clear();
        self.strategy = None;
        self.parameter_specs.clear();
        self.feature_specs.clear();
        self.collected_parameters.clear();
        self.feature_toggles = FeatureToggles::default();
        self.questions_asked = 0;
    }

    /// Trusted reference of the detected object
    pub fn reference(&self) -> Option<&Arc<ReferenceExample>> {
        self.detected_object
            .as_ref()
            .and_then(|object| object.reference.as_ref())
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}
