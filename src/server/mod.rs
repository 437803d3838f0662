//! HTTP server.
//!
//! Routes:
//!
//! - `GET  /api/logs/download?date=dd.MM.yyyy` - synchronous extract
//! - `POST /api/logs/generate?date=dd.MM.yyyy` - start a background extract
//! - `GET  /api/logs/status/{taskId}` - task status label
//! - `GET  /api/logs/result/{taskId}` - extract produced by a finished task

pub mod handlers;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use raceapp_tasks::ManagerError;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::logs::{FileLogSource, LogSource, LogTaskService};

/// Shared application state
#[derive(Debug)]
pub struct AppState {
    pub config: ServerConfig,
    pub source: Arc<dyn LogSource>,
    pub tasks: LogTaskService,
}

impl AppState {
    /// Builds the state for `config`, reading the configured log file.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: ServerConfig) -> Result<Self, ManagerError> {
        let source: Arc<dyn LogSource> = Arc::new(FileLogSource::new(config.log_file.clone()));
        Self::with_source(config, source)
    }

    /// Builds the state around an explicit log source.
    pub fn with_source(
        config: ServerConfig,
        source: Arc<dyn LogSource>,
    ) -> Result<Self, ManagerError> {
        let tasks = LogTaskService::new(
            Arc::clone(&source),
            config.tasks.clone(),
            config.generation_delay(),
        )?;
        Ok(Self {
            config,
            source,
            tasks,
        })
    }
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/logs/download", get(handlers::download))
        .route("/api/logs/generate", post(handlers::generate))
        .route("/api/logs/status/{task_id}", get(handlers::status))
        .route("/api/logs/result/{task_id}", get(handlers::result))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API until Ctrl+C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let address = config.bind_address();
    let state = Arc::new(AppState::new(config)?);
    let app = router(Arc::clone(&state));

    let listener = TcpListener::bind(&address).await?;
    info!(
        address = %listener.local_addr()?,
        log_file = %state.config.log_file.display(),
        generation_delay = ?state.tasks.generation_delay(),
        "raceapp listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.tasks.manager().shutdown();
    info!("raceapp stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
