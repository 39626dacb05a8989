//! Scheduler, service and router wired over in-memory storage

use std::sync::Arc;

use axum::Router;
use maintenance::config::Config;
use maintenance::database::Database;
use maintenance::scheduler::MaintenanceScheduler;
use maintenance::services::MaintenanceService;
use maintenance::topology::{ItemResolver, StaticTopology, Topology};
use maintenance::web::{create_router, AppState};

use super::test_data::switches;

/// The topology most tests run against: three switches, a few ports
pub fn test_topology() -> Arc<StaticTopology> {
    Arc::new(
        StaticTopology::new()
            .with_switch(switches::SWITCH_1, &[1, 2])
            .with_switch(switches::SWITCH_2, &[])
            .with_switch(switches::SWITCH_3, &[3]),
    )
}

pub struct TestHarness {
    pub topology: Arc<StaticTopology>,
    pub database: Arc<Database>,
    pub scheduler: Arc<MaintenanceScheduler>,
    pub service: Arc<MaintenanceService>,
}

impl TestHarness {
    pub async fn new() -> Self {
        let database = Arc::new(Database::in_memory().await.expect("Failed to open database"));
        Self::with_database(database).await
    }

    /// Scheduler over an existing database, as after a restart
    pub async fn with_database(database: Arc<Database>) -> Self {
        let topology = test_topology();
        let dyn_topology: Arc<dyn Topology> = topology.clone();
        let scheduler = Arc::new(MaintenanceScheduler::new(
            dyn_topology.clone(),
            database.clone(),
        ));
        let service = Arc::new(MaintenanceService::new(
            scheduler.clone(),
            ItemResolver::new(dyn_topology),
            chrono_tz::UTC,
        ));

        Self {
            topology,
            database,
            scheduler,
            service,
        }
    }

    pub fn router(&self) -> Router {
        let state = AppState::new(Arc::new(Config::default()), self.service.clone());
        create_router(state)
    }
}

