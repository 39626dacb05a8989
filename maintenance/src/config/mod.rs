// File: maintenance/src/config/mod.rs
pub mod manager;
use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
pub use manager::ConfigManager;

use crate::constants::{defaults, time};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// IANA zone the fixed-format timestamps are read and written in
    #[serde(default = "default_timezone")]
    pub timezone: String,
    // Finished windows older than this are purged by the retention job
    pub retention_hours: Option<u32>,
    pub retention_schedule: Option<String>,
    // Populated from individual switch config files
    #[serde(skip)]
    pub switches: HashMap<String, SwitchConfig>,
}

fn default_host() -> String {
    defaults::HOST.to_string()
}

fn default_port() -> u16 {
    defaults::PORT
}

fn default_database_path() -> String {
    defaults::DATABASE_PATH.to_string()
}

fn default_timezone() -> String {
    time::DEFAULT_TIMEZONE.to_string()
}

impl Config {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone '{}': {}", self.timezone, e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            timezone: default_timezone(),
            retention_hours: None,
            retention_schedule: None,
            switches: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchConfig {
    pub id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(skip)]
    pub interfaces: Vec<InterfaceConfig>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceConfig {
    pub port: u32,
    pub name: Option<String>,
}

impl SwitchConfig {
    /// Interface ids are `<switch id>:<port>`
    pub fn interface_id(&self, port: u32) -> String {
        format!("{}:{}", self.id, port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchConfigFile {
    pub switch: SwitchConfig,
    #[serde(default)]
    pub interfaces: Vec<InterfaceConfig>,
}
