//! Topology whose flag operations always fail

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use maintenance::topology::Topology;
use maintenance::window::ItemRef;
use std::sync::atomic::{AtomicU32, Ordering};

/// Knows every switch id but refuses to flag anything
#[derive(Default)]
pub struct FailingTopology {
    pub set_calls: AtomicU32,
    pub clear_calls: AtomicU32,
}

impl FailingTopology {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Topology for FailingTopology {
    async fn contains_switch(&self, _switch_id: &str) -> bool {
        true
    }

    async fn contains_interface(&self, _interface_id: &str) -> bool {
        false
    }

    async fn set_under_maintenance(&self, item: &ItemRef, _window_id: &str) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("controller unreachable while flagging {}", item))
    }

    async fn clear_under_maintenance(&self, item: &ItemRef, _window_id: &str) -> Result<()> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("controller unreachable while releasing {}", item))
    }
}
