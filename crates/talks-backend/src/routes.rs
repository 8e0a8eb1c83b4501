use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post, put},
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;

fn cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = if cfg!(debug_assertions) {
        let dev_ports = vec![3000, 8000, 8080, 8081, 5173];
        let mut allowed_origins = Vec::new();
        for port in dev_ports {
            allowed_origins.push(format!("http://localhost:{port}"));
            allowed_origins.push(format!("http://127.0.0.1:{port}"));
        }
        allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin).ok())
            .collect()
    } else {
        // Production origins - add your domains here
        vec![]
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
}

/// Setup the routes for the server and configure middleware
pub fn setup_routes(state: Arc<crate::AppState>) -> Router {
    use handlers::{health, metrics, sessions};

    Router::new()
        .route("/sessions", get(sessions::list).post(sessions::create))
        .route("/sessions/nessProbe", get(sessions::ness_probe))
        .route("/sessions/updateHealthStatus", post(health::update_status))
        .route(
            "/sessions/{session_id}",
            get(sessions::get)
                .put(sessions::update)
                .delete(sessions::delete),
        )
        .route("/sessions/{session_id}/speakers", get(sessions::speakers))
        .route(
            "/sessions/{session_id}/speakers/{speaker_id}",
            put(sessions::add_speaker).delete(sessions::remove_speaker),
        )
        .route("/health", get(health::get))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics::get))
        .layer(CatchPanicLayer::custom(handlers::error::handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors())
        .with_state(state)
}
