//! Session Registry Use Case
//!
//! Owns the live sessions of a process. Turns of one session are
//! serialised: a turn arriving while another is running for the same
//! session is rejected instead of queued. Sessions share nothing but the
//! engine.

use std::sync::Arc;

use cadgen_domain::entities::ConversationSession;
use cadgen_domain::error::{Error, Result};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use super::conversation::{AssistantResponse, ConversationEngine};

/// Live sessions keyed by id
pub struct SessionRegistry {
    engine: Arc<ConversationEngine>,
    sessions: DashMap<Uuid, Arc<Mutex<ConversationSession>>>,
}

impl SessionRegistry {
    pub fn new(engine: Arc<ConversationEngine>) -> Self {
        Self {
            engine,
            sessions: DashMap::new(),
        }
    }

    /// Open a new session and return its id
    pub fn start(&self) -> Uuid {
        let session = ConversationSession::new();
        let id = session.session_id;
        self.sessions.insert(id, Arc::new(Mutex::new(session)));
        info!(session = %id, "Session started");
        id
    }

    /// Run one turn of a session
    ///
    /// Ended sessions are dropped from the registry after their last turn.
    pub async fn advance(
        &self,
        id: Uuid,
        utterance: &str,
        cancel: &CancellationToken,
    ) -> Result<AssistantResponse> {
        let handle = self
            .sessions
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::not_found(format!("session {id}")))?;
        let mut session = handle
            .try_lock_owned()
            .map_err(|_| Error::TurnInProgress {
                session_id: id.to_string(),
            })?;

        let response = self
            .engine
            .advance_with_cancel(&mut session, utterance, cancel)
            .await;
        if session.is_ended() {
            drop(session);
            self.end(id);
        }
        response
    }

    /// Drop a session; returns whether it existed
    pub fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            info!(session = %id, "Session ended");
        }
        removed
    }

    /// Copy of a session's current state, waiting for a running turn
    pub async fn session(&self, id: Uuid) -> Option<ConversationSession> {
        let handle = self.sessions.get(&id).map(|entry| Arc::clone(entry.value()))?;
        let session = handle.lock().await;
        Some(session.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
