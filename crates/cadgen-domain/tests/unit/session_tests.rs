//! Tests for conversation session entities

use cadgen_domain::entities::{ConversationSession, SessionState, TurnRecord};

#[test]
fn test_new_session_awaits_object() {
    let session = ConversationSession::new();
    assert_eq!(session.state, SessionState::AwaitingObject);
    assert!(session.collected_parameters.is_empty());
    assert!(!session.is_ended());
}

#[test]
fn test_reset_keeps_history() {
    let mut session = ConversationSession::new();
    session.collected_parameters.insert("radius".to_string(), 40.0);
    session.feature_toggles.set("handle", false);
    session.questions_asked = 2;
    session.turn_history.push(TurnRecord {
        question: Some("What radius?".to_string()),
        parameter: Some("radius".to_string()),
        answer: "40".to_string(),
    });
    session.state = SessionState::ReadyToGenerate;

    session.reset_for_new_object();

    assert_eq!(session.state, SessionState::AwaitingObject);
    assert!(session.collected_parameters.is_empty());
    assert!(session.feature_toggles.is_empty());
    assert_eq!(session.questions_asked, 0);
    assert_eq!(session.turn_history.len(), 1);
    assert_eq!(session.turn_history[0].parameter.as_deref(), Some("radius"));
}
