pub mod config;
pub mod constants;
pub mod database;
pub mod errors;
pub mod maintenance_tracker;
pub mod scheduler;
pub mod services;
pub mod topology;
pub mod web;
pub mod window;

// Re-export commonly used types
pub use config::{Config, ConfigManager};
pub use database::Database;
pub use errors::{MaintenanceError, ValidationError};
pub use maintenance_tracker::MaintenanceTracker;
pub use scheduler::MaintenanceScheduler;
pub use services::MaintenanceService;
pub use topology::{ItemResolver, StaticTopology, Topology};
pub use window::{MaintenanceWindow, WindowStatus};
