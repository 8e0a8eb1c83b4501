use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use talks::errors::CodecError;
use talks::id::SessionId;
use talks::log;

/// Failures surfaced by the HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Malformed session payload: {0}")]
    MalformedInput(#[from] CodecError),
    #[error("Session {0} not found")]
    NotFound(SessionId),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::MalformedInput(_) => {
                log::debug!("Rejecting request: {}", self);
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            ApiError::Unexpected(_) => {
                log::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Turns a panicking handler into a 500 so other requests are unaffected.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Unexpected(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_status_codes() {
        let malformed = ApiError::from(CodecError::NotAnObject).into_response();
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

        let missing = ApiError::NotFound("44".into()).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let unexpected = ApiError::Unexpected("boom".to_string()).into_response();
        assert_eq!(unexpected.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn panics_become_server_errors() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
