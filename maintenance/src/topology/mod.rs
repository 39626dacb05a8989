//! Network topology collaborator
//!
//! The scheduler never owns topology elements. It asks the topology whether an
//! id exists when resolving items, and asks it to flag or unflag elements when
//! a window starts or ends.

pub mod resolver;
pub use resolver::ItemResolver;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use crate::config::{Config, SwitchConfig};
use crate::maintenance_tracker::MaintenanceTracker;
use crate::window::ItemRef;

#[async_trait]
pub trait Topology: Send + Sync {
    async fn contains_switch(&self, switch_id: &str) -> bool;

    async fn contains_interface(&self, interface_id: &str) -> bool;

    /// Marks the element named by `item` as under maintenance for `window_id`.
    async fn set_under_maintenance(&self, item: &ItemRef, window_id: &str) -> Result<()>;

    /// Releases the flag `window_id` holds on the element.
    async fn clear_under_maintenance(&self, item: &ItemRef, window_id: &str) -> Result<()>;
}

/// Topology loaded from the switch config files
pub struct StaticTopology {
    switches: HashSet<String>,
    interfaces: HashMap<String, String>, // interface id -> switch id
    tracker: MaintenanceTracker,
}

impl StaticTopology {
    pub fn new() -> Self {
        Self {
            switches: HashSet::new(),
            interfaces: HashMap::new(),
            tracker: MaintenanceTracker::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut topology = Self::new();
        for switch in config.switches.values() {
            topology.switches.insert(switch.id.clone());
            for interface in &switch.interfaces {
                topology
                    .interfaces
                    .insert(switch.interface_id(interface.port), switch.id.clone());
            }
        }
        topology
    }

    /// Adds a switch and its numbered ports.
    pub fn with_switch(mut self, switch_id: &str, ports: &[u32]) -> Self {
        let switch = SwitchConfig {
            id: switch_id.to_string(),
            enabled: true,
            interfaces: Vec::new(),
        };
        self.switches.insert(switch.id.clone());
        for port in ports {
            self.interfaces
                .insert(switch.interface_id(*port), switch.id.clone());
        }
        self
    }

    pub async fn is_under_maintenance(&self, item: &ItemRef) -> bool {
        self.tracker.is_in_maintenance(&item.element_key()).await
    }

    fn ensure_known(&self, item: &ItemRef) -> Result<()> {
        let known = match item {
            ItemRef::Switch(id) => self.switches.contains(id),
            ItemRef::Interface(id) => self.interfaces.contains_key(id),
            ItemRef::TaggedInterface { interface_id, .. } => {
                self.interfaces.contains_key(interface_id)
            }
        };
        if known {
            Ok(())
        } else {
            Err(anyhow!("Element {} is no longer part of the topology", item))
        }
    }
}

impl Default for StaticTopology {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Topology for StaticTopology {
    async fn contains_switch(&self, switch_id: &str) -> bool {
        self.switches.contains(switch_id)
    }

    async fn contains_interface(&self, interface_id: &str) -> bool {
        self.interfaces.contains_key(interface_id)
    }

    async fn set_under_maintenance(&self, item: &ItemRef, window_id: &str) -> Result<()> {
        self.ensure_known(item)?;
        self.tracker
            .start_maintenance(&item.element_key(), window_id)
            .await;
        Ok(())
    }

    async fn clear_under_maintenance(&self, item: &ItemRef, window_id: &str) -> Result<()> {
        self.ensure_known(item)?;
        self.tracker
            .end_maintenance(&item.element_key(), window_id)
            .await;
        Ok(())
    }
}
