use std::sync::Arc;

use clap::Parser;
use tokio::signal;

use talks::errors::Report;
use talks::log;

mod bootstrap;
mod config;
mod handlers;
mod metrics;
mod routes;
mod services;

use config::Config;
use metrics::Metrics;
use services::{EnvOverride, HealthEvaluator, OverrideSource, SessionStore, SessionStoreInMemory};

/// State shared by every handler.
pub struct AppState {
    pub sessions: Arc<SessionStoreInMemory>,
    pub health: HealthEvaluator,
    pub metrics: Metrics,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(
        sessions: Arc<SessionStoreInMemory>,
        override_source: Box<dyn OverrideSource>,
    ) -> Result<Self, prometheus::Error> {
        Ok(Self {
            health: HealthEvaluator::new(sessions.clone(), override_source),
            sessions,
            metrics: Metrics::new()?,
            started_at: chrono::Utc::now(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    // Setup logging
    talks::log::setup()?;

    let config = Config::parse();

    // Seed the store
    let seed = match &config.bootstrap {
        Some(path) => bootstrap::load_from_path(path)?,
        None => bootstrap::load_default()?,
    };
    let sessions = Arc::new(SessionStoreInMemory::new());
    sessions.bootstrap(seed).await;
    log::info!("Initialised {} sessions from bootstrap data", sessions.len());

    let state = Arc::new(AppState::new(
        sessions,
        Box::new(EnvOverride::new(config.app_down_var.clone())),
    )?);

    // Setup the routes
    let app = routes::setup_routes(state);

    // Setup the server
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Starting server on http://{}", addr);
    log::info!("Press Ctrl+C to stop the server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Shutting down server");

    Ok(())
}

/// Wait for a shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("Signal received, starting graceful shutdown");
}
