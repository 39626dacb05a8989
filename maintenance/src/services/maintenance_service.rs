// File: maintenance/src/services/maintenance_service.rs
use crate::errors::MaintenanceError;
use crate::scheduler::MaintenanceScheduler;
use crate::topology::ItemResolver;
use crate::window::validation;
use crate::window::{MaintenanceRequest, MaintenanceWindow, UpdateRequest, WindowSummary};
use chrono::Utc;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{info, warn};

/// Boundary the HTTP layer calls. Builds candidates through the validated
/// constructor path and hands them to the scheduler; holds no window state.
pub struct MaintenanceService {
    scheduler: Arc<MaintenanceScheduler>,
    resolver: ItemResolver,
    timezone: Tz,
}

impl MaintenanceService {
    pub fn new(scheduler: Arc<MaintenanceScheduler>, resolver: ItemResolver, timezone: Tz) -> Self {
        Self {
            scheduler,
            resolver,
            timezone,
        }
    }

    /// Validates and schedules a new window, returning its id.
    pub async fn create(&self, request: &MaintenanceRequest) -> Result<String, MaintenanceError> {
        let window = MaintenanceWindow::from_request(request, &self.resolver, self.timezone)
            .await
            .inspect_err(|e| warn!("Rejected maintenance window: {}", e))?;

        validation::check_schedule(window.start, window.end, Utc::now())
            .inspect_err(|e| warn!("Rejected maintenance window: {}", e))?;

        let id = window.id.clone();
        self.scheduler.add(window).await?;
        info!("Maintenance window {} created", id);
        Ok(id)
    }

    pub async fn list(&self) -> Vec<WindowSummary> {
        self.scheduler
            .list()
            .await
            .iter()
            .map(|window| window.summary(self.timezone))
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<WindowSummary, MaintenanceError> {
        self.scheduler
            .get(id)
            .await
            .map(|window| window.summary(self.timezone))
            .ok_or_else(|| MaintenanceError::not_found(id))
    }

    /// Changes a pending window; the merged candidate passes the same checks as a new one.
    pub async fn update(&self, id: &str, changes: &UpdateRequest) -> Result<(), MaintenanceError> {
        let current = self
            .scheduler
            .get(id)
            .await
            .ok_or_else(|| MaintenanceError::not_found(id))?;

        let candidate = current
            .with_changes(changes, &self.resolver, self.timezone)
            .await?;
        validation::check_schedule(candidate.start, candidate.end, Utc::now())?;

        self.scheduler.replace(candidate).await?;
        info!("Maintenance window {} updated", id);
        Ok(())
    }

    pub async fn remove(&self, id: &str) -> Result<(), MaintenanceError> {
        let window = self.scheduler.remove(id).await?;
        info!("Maintenance window {} removed ({})", id, window.status);
        Ok(())
    }

    pub async fn end(&self, id: &str) -> Result<(), MaintenanceError> {
        self.scheduler.end_now(id).await?;
        Ok(())
    }
}
