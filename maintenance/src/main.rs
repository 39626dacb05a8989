// File: maintenance/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use maintenance::config::ConfigManager;
use maintenance::database::Database;
use maintenance::scheduler::retention::RetentionJob;
use maintenance::scheduler::MaintenanceScheduler;
use maintenance::services::MaintenanceService;
use maintenance::topology::{ItemResolver, StaticTopology, Topology};
use maintenance::web::start_web_server;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("maintenance=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("tokio_cron_scheduler=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting maintenance window scheduler");

    let config_dir = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let config_manager = ConfigManager::new(config_dir).await?;
    let config = config_manager.get_current_config();
    let timezone = config.tz()?;
    info!(
        "Configuration loaded: {} switches, timezone {}",
        config.switches.len(),
        timezone
    );

    let database = Arc::new(Database::new(&config.database_path).await?);

    let topology: Arc<dyn Topology> = Arc::new(StaticTopology::from_config(&config));
    info!("Topology initialized");

    let scheduler = Arc::new(MaintenanceScheduler::new(topology.clone(), database));
    let restored = scheduler.restore().await?;
    info!("Scheduler initialized with {} stored windows", restored);

    let scheduler_loop = scheduler.start();

    let retention = match (config.retention_hours, config.retention_schedule.as_deref()) {
        (Some(hours), Some(schedule)) => {
            Some(RetentionJob::start(scheduler.as_ref().clone(), schedule, hours).await?)
        }
        _ => {
            warn!("No retention policy configured, finished windows are kept indefinitely");
            None
        }
    };

    let maintenance_service = Arc::new(MaintenanceService::new(
        scheduler,
        ItemResolver::new(topology),
        timezone,
    ));
    info!("MaintenanceService initialized");

    start_web_server(config, maintenance_service).await?;

    if let Some(job) = retention {
        job.shutdown().await?;
    }
    scheduler_loop.abort();

    info!("Maintenance window scheduler stopped");
    Ok(())
}
