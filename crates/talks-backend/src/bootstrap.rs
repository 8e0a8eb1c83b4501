//! Seed data loaded into the store once at startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use talks::data::Session;
use talks::id::SpeakerId;

const DEFAULT_DATASET: &str = include_str!("../data/sessions.json");

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Failed to read bootstrap data from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse bootstrap data")]
    Parse(#[from] serde_json::Error),
}

/// One record of the bootstrap dataset.
///
/// Only `id` is mandatory; everything else falls back to empty values.
#[derive(Debug, Deserialize)]
struct BootstrapSession {
    id: String,
    #[serde(default)]
    r#abstract: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    r#type: String,
    #[serde(default)]
    speakers: Vec<String>,
    #[serde(default)]
    schedule: i32,
}

impl From<BootstrapSession> for Session {
    fn from(record: BootstrapSession) -> Self {
        Session {
            r#abstract: record.r#abstract,
            title: record.title,
            code: record.code,
            r#type: record.r#type,
            speakers: record.speakers.into_iter().map(SpeakerId::from).collect(),
            schedule: record.schedule,
            ..Session::new(record.id)
        }
    }
}

/// Parses a dataset given as a JSON array of session records.
pub fn parse(json: &str) -> Result<Vec<Session>, BootstrapError> {
    let records: Vec<BootstrapSession> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(Session::from).collect())
}

/// The dataset compiled into the binary.
pub fn load_default() -> Result<Vec<Session>, BootstrapError> {
    parse(DEFAULT_DATASET)
}

pub fn load_from_path(path: &Path) -> Result<Vec<Session>, BootstrapError> {
    let json = std::fs::read_to_string(path).map_err(|source| BootstrapError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(sessions: &'a [Session], id: &str) -> &'a Session {
        sessions
            .iter()
            .find(|session| session.id.as_str() == id)
            .unwrap_or_else(|| panic!("session {id} missing from the default dataset"))
    }

    #[test]
    fn default_dataset_has_the_known_sessions() {
        let sessions = load_default().unwrap();

        assert!(find(&sessions, "44").r#abstract.contains("Writing code is easy"));
        assert!(find(&sessions, "45").title.contains("Creating Amazing Game Concepts"));
        assert!(find(&sessions, "47").has_speaker(&"159".into()));
    }

    #[test]
    fn missing_optional_fields_default_to_empty() {
        let sessions = parse(r#"[{"id": "1"}]"#).unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id.as_str(), "1");
        assert!(sessions[0].speakers.is_empty());
        assert_eq!(sessions[0].schedule, 0);
        assert_eq!(sessions[0].title, "");
    }

    #[test]
    fn records_need_an_id() {
        assert!(matches!(
            parse(r#"[{"title": "Anonymous"}]"#),
            Err(BootstrapError::Parse(_))
        ));
    }

    #[test]
    fn unreadable_paths_are_reported() {
        let err = load_from_path(Path::new("/definitely/not/here/sessions.json")).unwrap_err();
        assert!(matches!(err, BootstrapError::Read { .. }));
    }
}
