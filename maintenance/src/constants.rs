//! Application-wide constants for time formats, limits, and default values
//!
//! This module organizes constants by category to keep user-visible strings
//! and scheduling limits in one place.

use std::time::Duration;

/// Timestamp handling
pub mod time {
    /// Fixed wire format used for both parsing requests and rendering responses
    pub const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S";

    /// Zone used when the configuration does not name one
    pub const DEFAULT_TIMEZONE: &str = "UTC";
}

/// Scheduler loop tuning
pub mod scheduler {
    use super::Duration;

    /// Upper bound on a single control loop sleep, so wall clock jumps are noticed
    pub const MAX_SLEEP: Duration = Duration::from_secs(60);
}

/// Tag value ranges accepted on tagged sub-interfaces
pub mod tags {
    pub const VLAN_MIN: u32 = 1;
    pub const VLAN_MAX: u32 = 4095;
    pub const MPLS_MAX: u32 = 1_048_575;
}

/// Reason strings returned verbatim to API callers
pub mod messages {
    pub const INVALID_ITEMS: &str = "One or more items are invalid";
    pub const NO_ITEMS: &str = "At least one item must be provided";
    pub const START_IN_PAST: &str = "Start in the past not allowed";
    pub const END_BEFORE_START: &str = "End before start not allowed";
}

/// Default configuration values
pub mod defaults {
    /// Default bind address
    pub const HOST: &str = "0.0.0.0";

    /// Default HTTP port
    pub const PORT: u16 = 8181;

    /// Default SQLite file
    pub const DATABASE_PATH: &str = "data/maintenance.db";
}
