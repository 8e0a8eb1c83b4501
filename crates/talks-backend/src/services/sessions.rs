use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use talks::data::Session;
use talks::id::{SessionId, SpeakerId};

use super::health::{ProbeError, ReadinessProbe};

/// A store of conference sessions keyed by id.
///
/// None of the operations can fail: an unknown id is reported as `None` and the
/// HTTP layer decides how to present that. Implementations must tolerate any
/// number of concurrent callers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session under a freshly minted id.
    ///
    /// Whatever id the caller supplied is discarded.
    async fn create(&self, session: Session) -> Session;

    /// Returns every stored session, in no particular order.
    async fn list(&self) -> Vec<Session>;

    async fn find(&self, session_id: &SessionId) -> Option<Session>;

    /// Replaces an existing session.
    ///
    /// The stored entry takes `session_id` as its id regardless of the payload.
    /// Returns the entry as it was before the replacement, or `None` (and
    /// changes nothing) if the id is unknown.
    async fn update(&self, session_id: &SessionId, session: Session) -> Option<Session>;

    /// Deletes a session and returns it.
    async fn remove(&self, session_id: &SessionId) -> Option<Session>;

    /// Adds a speaker to a session and returns the updated session.
    ///
    /// Adding a speaker that is already listed leaves the session unchanged.
    async fn add_speaker(&self, session_id: &SessionId, speaker_id: SpeakerId)
    -> Option<Session>;

    /// Removes a speaker from a session and returns the updated session.
    async fn remove_speaker(
        &self,
        session_id: &SessionId,
        speaker_id: &SpeakerId,
    ) -> Option<Session>;

    /// Seeds the store, keeping the ids the sessions already carry.
    async fn bootstrap(&self, sessions: Vec<Session>);
}

/// An in-memory implementation of the `SessionStore` trait.
///
/// This implementation uses a `DashMap`, so single-key reads and writes from
/// concurrent handlers never block each other across shards. Update and
/// speaker changes hold the entry lock for the whole read-modify-write.
pub struct SessionStoreInMemory {
    sessions: DashMap<SessionId, Session>,
}

impl SessionStoreInMemory {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStoreInMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for SessionStoreInMemory {
    async fn create(&self, mut session: Session) -> Session {
        loop {
            let session_id = SessionId::generate();
            if let Entry::Vacant(slot) = self.sessions.entry(session_id.clone()) {
                session.id = session_id;
                slot.insert(session.clone());
                return session;
            }
        }
    }

    async fn list(&self) -> Vec<Session> {
        self.sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    async fn find(&self, session_id: &SessionId) -> Option<Session> {
        self.sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
    }

    async fn update(&self, session_id: &SessionId, mut session: Session) -> Option<Session> {
        let mut entry = self.sessions.get_mut(session_id)?;
        session.id = session_id.clone();
        Some(std::mem::replace(entry.value_mut(), session))
    }

    async fn remove(&self, session_id: &SessionId) -> Option<Session> {
        self.sessions
            .remove(session_id)
            .map(|(_, session)| session)
    }

    async fn add_speaker(
        &self,
        session_id: &SessionId,
        speaker_id: SpeakerId,
    ) -> Option<Session> {
        let mut entry = self.sessions.get_mut(session_id)?;
        entry.add_speaker(speaker_id);
        Some(entry.value().clone())
    }

    async fn remove_speaker(
        &self,
        session_id: &SessionId,
        speaker_id: &SpeakerId,
    ) -> Option<Session> {
        let mut entry = self.sessions.get_mut(session_id)?;
        entry.remove_speaker(speaker_id);
        Some(entry.value().clone())
    }

    async fn bootstrap(&self, sessions: Vec<Session>) {
        for session in sessions {
            self.sessions.insert(session.id.clone(), session);
        }
    }
}

#[async_trait]
impl ReadinessProbe for SessionStoreInMemory {
    // Walks the same read path `GET /sessions` uses.
    async fn probe(&self) -> Result<(), ProbeError> {
        let sessions = self.list().await;
        if sessions.iter().any(|session| session.id.is_empty()) {
            return Err(ProbeError::Unavailable(
                "stored session without an id".to_string(),
            ));
        }
        Ok(())
    }
}
