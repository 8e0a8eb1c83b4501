use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use talks::codec;
use talks::data::Session;
use talks::id::{SessionId, SpeakerId};
use talks::log;

use super::ApiError;
use crate::services::SessionStore;

/// Handler to list every session
pub async fn list(State(state): State<Arc<crate::AppState>>) -> Json<Vec<Session>> {
    state.metrics.record("list");
    Json(state.sessions.list().await)
}

/// Handler to create a new session; the server assigns the id
pub async fn create(
    State(state): State<Arc<crate::AppState>>,
    body: Bytes,
) -> Result<Json<Session>, ApiError> {
    state.metrics.record("create");
    let session = codec::decode(&body)?;
    log::debug!("Creating session from payload with id {}", session.id);

    let created = state.sessions.create(session).await;
    log::info!("Created session {}", created.id);
    Ok(Json(created))
}

/// Handler to get a session by ID
pub async fn get(
    State(state): State<Arc<crate::AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    state.metrics.record("get");
    let session_id = SessionId::from(session_id);
    let found = state.sessions.find(&session_id).await;
    found.map(Json).ok_or(ApiError::NotFound(session_id))
}

/// Handler to replace a session; the path id wins over any id in the body.
///
/// Responds with the entry as it was before the replacement.
pub async fn update(
    State(state): State<Arc<crate::AppState>>,
    Path(session_id): Path<String>,
    body: Bytes,
) -> Result<Json<Session>, ApiError> {
    state.metrics.record("update");
    let session_id = SessionId::from(session_id);
    let session = codec::decode(&body)?;

    let previous = state.sessions.update(&session_id, session).await;
    match previous {
        Some(previous) => {
            log::info!("Updated session {}", session_id);
            Ok(Json(previous))
        }
        None => Err(ApiError::NotFound(session_id)),
    }
}

/// Handler to delete a session
pub async fn delete(
    State(state): State<Arc<crate::AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.metrics.record("delete");
    let session_id = SessionId::from(session_id);
    let removed = state.sessions.remove(&session_id).await;
    match removed {
        Some(_) => {
            log::info!("Deleted session {}", session_id);
            Ok(StatusCode::OK)
        }
        None => Err(ApiError::NotFound(session_id)),
    }
}

/// Handler to list the speakers of a session
pub async fn speakers(
    State(state): State<Arc<crate::AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<SpeakerId>>, ApiError> {
    state.metrics.record("speakers");
    let session_id = SessionId::from(session_id);
    let found = state.sessions.find(&session_id).await;
    found
        .map(|session| Json(session.speakers))
        .ok_or(ApiError::NotFound(session_id))
}

pub async fn add_speaker(
    State(state): State<Arc<crate::AppState>>,
    Path((session_id, speaker_id)): Path<(String, String)>,
) -> Result<Json<Session>, ApiError> {
    state.metrics.record("add_speaker");
    let session_id = SessionId::from(session_id);
    let speaker_id = SpeakerId::from(speaker_id);
    log::debug!("Adding speaker {} to session {}", speaker_id, session_id);
    let updated = state.sessions.add_speaker(&session_id, speaker_id).await;
    updated.map(Json).ok_or(ApiError::NotFound(session_id))
}

pub async fn remove_speaker(
    State(state): State<Arc<crate::AppState>>,
    Path((session_id, speaker_id)): Path<(String, String)>,
) -> Result<Json<Session>, ApiError> {
    state.metrics.record("remove_speaker");
    let session_id = SessionId::from(session_id);
    let speaker_id = SpeakerId::from(speaker_id);
    log::debug!("Removing speaker {} from session {}", speaker_id, session_id);
    let updated = state.sessions.remove_speaker(&session_id, &speaker_id).await;
    updated.map(Json).ok_or(ApiError::NotFound(session_id))
}

/// Readiness probe for orchestrators that only look at the status code
pub async fn ness_probe() -> String {
    format!("sessions ready at {}", chrono::Utc::now().to_rfc2822())
}
