// File: maintenance/src/web/mod.rs
pub mod handlers;
pub mod server;

pub use server::{create_router, start_web_server};

use std::sync::Arc;

use crate::config::Config;
use crate::services::MaintenanceService;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub maintenance_service: Arc<MaintenanceService>,
}

impl AppState {
    pub fn new(config: Arc<Config>, maintenance_service: Arc<MaintenanceService>) -> Self {
        Self {
            config,
            maintenance_service,
        }
    }
}
