use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use talks::data::{HealthCheck, HealthResponse, HealthState, UptimeInfo};
use talks::log;

fn uptime_seconds(started_at: chrono::DateTime<chrono::Utc>) -> i64 {
    (chrono::Utc::now() - started_at).num_seconds()
}

fn human_readable_uptime(started_at: chrono::DateTime<chrono::Utc>) -> String {
    let uptime_duration: chrono::TimeDelta = chrono::Utc::now().signed_duration_since(started_at);

    let uptime_seconds = uptime_duration.num_seconds();
    let days = uptime_duration.num_days();
    let hours = (uptime_seconds % 86400) / 3600;
    let minutes = (uptime_seconds % 3600) / 60;
    let secs = uptime_seconds % 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {secs}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

fn status_code(outcome: HealthState) -> StatusCode {
    match outcome {
        HealthState::Up => StatusCode::OK,
        HealthState::Down => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn respond(state: &crate::AppState, checks: Vec<HealthCheck>) -> (StatusCode, Json<HealthResponse>) {
    let outcome = HealthState::combine(checks.iter().map(|check| &check.state));

    let health_response = HealthResponse {
        outcome,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
        started_at: state.started_at.to_rfc3339(),
        uptime: UptimeInfo {
            seconds: uptime_seconds(state.started_at),
            human: human_readable_uptime(state.started_at),
        },
        active_sessions: state.sessions.len(),
    };

    if outcome.is_up() {
        log::debug!("Health check: {:?}", health_response);
    } else {
        log::warn!("Health check reported down: {:?}", health_response.checks);
    }

    (status_code(outcome), Json(health_response))
}

/// Both checks
pub async fn get(State(state): State<Arc<crate::AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let checks = state.health.checks().await;
    respond(&state, checks)
}

/// Liveness: the lenient check only
pub async fn live(State(state): State<Arc<crate::AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let check = state.health.successful_check().await;
    respond(&state, vec![check])
}

/// Readiness: the strict check only
pub async fn ready(
    State(state): State<Arc<crate::AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let check = state.health.failed_check().await;
    respond(&state, vec![check])
}

#[derive(Debug, Deserialize)]
pub struct HealthStatusParams {
    #[serde(rename = "isAppDown")]
    is_app_down: Option<String>,
}

impl HealthStatusParams {
    /// Only a case-insensitive `true` marks the app down; anything else means up.
    fn is_app_down(&self) -> bool {
        self.is_app_down
            .as_deref()
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }
}

/// Flags the app up or down at runtime; a missing flag means up.
pub async fn update_status(
    State(state): State<Arc<crate::AppState>>,
    Query(params): Query<HealthStatusParams>,
) -> StatusCode {
    state.metrics.record("update_health_status");
    let down = params.is_app_down();
    state.health.set_app_down(down);
    log::info!("App marked {}", if down { "down" } else { "up" });
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_human_readable() {
        let now = chrono::Utc::now();
        assert_eq!(human_readable_uptime(now), "0s");

        let earlier = now - chrono::TimeDelta::seconds(90061);
        assert!(human_readable_uptime(earlier).starts_with("1d 1h 1m"));
        assert!(uptime_seconds(earlier) >= 90061);
    }

    #[test]
    fn app_down_parsing_is_lenient() {
        let params = |value: Option<&str>| HealthStatusParams {
            is_app_down: value.map(str::to_string),
        };

        assert!(params(Some("true")).is_app_down());
        assert!(params(Some("TRUE")).is_app_down());
        assert!(params(Some("True")).is_app_down());
        assert!(!params(Some("false")).is_app_down());
        assert!(!params(Some("yes")).is_app_down());
        assert!(!params(Some("")).is_app_down());
        assert!(!params(None).is_app_down());
    }

    #[test]
    fn down_is_service_unavailable() {
        assert_eq!(status_code(HealthState::Up), StatusCode::OK);
        assert_eq!(status_code(HealthState::Down), StatusCode::SERVICE_UNAVAILABLE);
    }
}
