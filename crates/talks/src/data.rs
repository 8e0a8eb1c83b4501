//! Data structures shared between the backend and its clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::{SessionId, SpeakerId};

/// A conference talk.
///
/// The JSON representation is defined by [`crate::codec`]; `extra` holds any
/// input keys outside the seven known fields and is never written back out.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub r#abstract: String,
    pub title: String,
    pub code: String,
    pub r#type: String,
    pub speakers: Vec<SpeakerId>,
    pub schedule: i32,
    pub extra: Map<String, Value>,
}

impl Session {
    /// An empty session with the given id.
    pub fn new(id: impl Into<SessionId>) -> Self {
        Self {
            id: id.into(),
            r#abstract: String::new(),
            title: String::new(),
            code: String::new(),
            r#type: String::new(),
            speakers: Vec::new(),
            schedule: 0,
            extra: Map::new(),
        }
    }

    pub fn has_speaker(&self, speaker_id: &SpeakerId) -> bool {
        self.speakers.contains(speaker_id)
    }

    /// Adds a speaker, returning `false` if they were already listed.
    pub fn add_speaker(&mut self, speaker_id: SpeakerId) -> bool {
        if self.has_speaker(&speaker_id) {
            return false;
        }
        self.speakers.push(speaker_id);
        true
    }

    /// Removes a speaker, returning `false` if they were not listed.
    pub fn remove_speaker(&mut self, speaker_id: &SpeakerId) -> bool {
        let before = self.speakers.len();
        self.speakers.retain(|s| s != speaker_id);
        self.speakers.len() != before
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthState {
    Up,
    Down,
}

impl HealthState {
    /// `Down` if any state is `Down`, otherwise `Up`.
    pub fn combine<'a>(states: impl IntoIterator<Item = &'a HealthState>) -> Self {
        if states.into_iter().any(|state| *state == HealthState::Down) {
            HealthState::Down
        } else {
            HealthState::Up
        }
    }

    pub fn is_up(&self) -> bool {
        *self == HealthState::Up
    }
}

/// The verdict of a single named health check.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    pub name: String,
    pub state: HealthState,
}

impl HealthCheck {
    pub fn new(name: impl Into<String>, state: HealthState) -> Self {
        Self {
            name: name.into(),
            state,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UptimeInfo {
    pub seconds: i64,
    pub human: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub outcome: HealthState,
    pub checks: Vec<HealthCheck>,
    pub timestamp: String,
    pub started_at: String,
    pub uptime: UptimeInfo,
    pub active_sessions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speakers_are_kept_unique() {
        let mut session = Session::new("47");
        assert!(session.add_speaker("159".into()));
        assert!(!session.add_speaker("159".into()));
        assert_eq!(session.speakers.len(), 1);

        assert!(session.remove_speaker(&"159".into()));
        assert!(!session.remove_speaker(&"159".into()));
        assert!(session.speakers.is_empty());
    }

    #[test]
    fn any_down_check_wins() {
        let none: [HealthState; 0] = [];
        assert_eq!(HealthState::combine(&none), HealthState::Up);
        assert_eq!(
            HealthState::combine(&[HealthState::Up, HealthState::Up]),
            HealthState::Up
        );
        assert_eq!(
            HealthState::combine(&[HealthState::Up, HealthState::Down]),
            HealthState::Down
        );
    }

    #[test]
    fn health_state_uses_uppercase_names() {
        let check = HealthCheck::new("Session:successful-check", HealthState::Up);
        let json = serde_json::to_value(&check).unwrap();
        assert_eq!(json["state"], "UP");
        assert_eq!(json["name"], "Session:successful-check");
    }
}
