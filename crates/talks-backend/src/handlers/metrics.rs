use std::sync::Arc;

use axum::extract::State;

use super::ApiError;

/// Prometheus scrape endpoint; refreshes the store size gauge first
pub async fn get(State(state): State<Arc<crate::AppState>>) -> Result<String, ApiError> {
    state.metrics.set_session_count(state.sessions.len());
    state
        .metrics
        .render()
        .map_err(|e| ApiError::Unexpected(format!("failed to encode metrics: {e}")))
}
