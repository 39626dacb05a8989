// File: maintenance/src/web/server.rs
use crate::config::Config;
use crate::services::MaintenanceService;
use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub async fn start_web_server(
    config: Arc<Config>,
    maintenance_service: Arc<MaintenanceService>,
) -> Result<()> {
    let state = AppState::new(config, maintenance_service);
    let addr = format!("{}:{}", state.config.host, state.config.port);

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// All routes live under `/api`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // === MAINTENANCE WINDOW ROUTES ===
        .route(
            "/api/maintenance",
            get(handlers::list_maintenance).post(handlers::create_maintenance),
        )
        .route(
            "/api/maintenance/{mw_id}",
            get(handlers::get_maintenance)
                .patch(handlers::update_maintenance)
                .delete(handlers::remove_maintenance),
        )
        .route(
            "/api/maintenance/{mw_id}/end",
            patch(handlers::end_maintenance),
        )
        // Add middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
