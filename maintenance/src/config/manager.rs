// File: maintenance/src/config/manager.rs
use super::{Config, SwitchConfigFile};
use anyhow::{anyhow, Result};
use glob::glob;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info, warn};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        let main_config_content = fs::read_to_string(&main_config_path).await
            .map_err(|e| anyhow!("Failed to read main config {}: {}", main_config_path, e))?;

        let mut config: Config = toml::from_str(&main_config_content)
            .map_err(|e| anyhow!("Failed to parse main config: {}", e))?;

        // Fail early on a bad zone rather than on the first request
        config.tz()?;

        if config.retention_hours.is_some() != config.retention_schedule.is_some() {
            warn!("retention_hours and retention_schedule must both be set, retention disabled");
        }

        // Every other file describes one switch of the static topology
        let pattern = format!("{}/*.toml", config_dir);
        let mut switches = HashMap::new();

        for entry in glob(&pattern).map_err(|e| anyhow!("Glob pattern error: {}", e))? {
            let path = entry.map_err(|e| anyhow!("Glob entry error: {}", e))?;
            let filename = path.file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| anyhow!("Invalid filename"))?;

            if filename == "main.toml" {
                continue;
            }

            debug!("Loading switch config: {}", path.display());

            let content = fs::read_to_string(&path).await
                .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;

            let switch_file: SwitchConfigFile = toml::from_str(&content)
                .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?;

            let mut switch = switch_file.switch;
            if !switch.enabled {
                info!("Switch {} disabled in {}, skipping", switch.id, filename);
                continue;
            }

            if switches.contains_key(&switch.id) {
                return Err(anyhow!(
                    "Switch {} defined more than once (duplicate in {})",
                    switch.id,
                    filename
                ));
            }

            switch.interfaces = switch_file.interfaces;
            switches.insert(switch.id.clone(), switch);
        }

        config.switches = switches;

        info!(
            "Loaded {} switches with {} interfaces",
            config.switches.len(),
            config.switches.values().map(|s| s.interfaces.len()).sum::<usize>()
        );

        Ok(config)
    }
}
