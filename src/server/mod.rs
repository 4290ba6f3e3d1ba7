//! Process-level wiring: configuration, logging, and the HTTP listener.

use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::db;
use crate::server::config::ServerConfig;
use crate::web::{self, AppState};

pub mod config;
pub mod logging;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Connects to the configured database and makes sure every table exists.
pub async fn prepare_database(config: &ServerConfig) -> Result<DatabaseConnection, BoxError> {
    let db_pool = db::connect(&config.database_url).await?;
    db::bootstrap_schema(&db_pool).await?;
    Ok(db_pool)
}

/// Serves the HTTP API until Ctrl-C is received.
pub async fn serve(config: Arc<ServerConfig>, db_pool: DatabaseConnection) -> Result<(), BoxError> {
    let app_state = Arc::new(AppState::new(db_pool, config.clone())?);
    let router = web::create_axum_router(app_state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %config.listen_addr, "HTTP server listening.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
