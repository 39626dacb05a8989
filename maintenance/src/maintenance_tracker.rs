// File: maintenance/src/maintenance_tracker.rs

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Maintenance flag held on one topology element
#[derive(Debug, Clone)]
pub struct ElementMaintenance {
    /// Windows currently holding the flag
    pub window_ids: BTreeSet<String>,
    pub flagged_at: DateTime<Utc>,
}

/// Tracks which topology elements are under maintenance.
///
/// An element stays flagged while any window holds it, so overlapping windows
/// on the same element release it only when the last one ends.
pub struct MaintenanceTracker {
    flagged: Arc<RwLock<HashMap<String, ElementMaintenance>>>,
}

impl MaintenanceTracker {
    pub fn new() -> Self {
        Self {
            flagged: Arc::new(RwLock::new(HashMap::with_capacity(32))),
        }
    }

    /// Adds `window_id` as a holder of the element's flag. Idempotent.
    pub async fn start_maintenance(&self, element_key: &str, window_id: &str) {
        let mut flagged = self.flagged.write().await;
        let entry = flagged
            .entry(element_key.to_string())
            .or_insert_with(|| ElementMaintenance {
                window_ids: BTreeSet::new(),
                flagged_at: Utc::now(),
            });

        if entry.window_ids.insert(window_id.to_string()) {
            info!(
                "Element {} under maintenance for window {} ({} holder(s))",
                element_key,
                window_id,
                entry.window_ids.len()
            );
        }
    }

    /// Releases the window's hold; clears the flag once no window holds it.
    pub async fn end_maintenance(&self, element_key: &str, window_id: &str) {
        let mut flagged = self.flagged.write().await;
        let Some(entry) = flagged.get_mut(element_key) else {
            warn!(
                "Tried to end maintenance of {} for window {} but it was not in maintenance",
                element_key, window_id
            );
            return;
        };

        if !entry.window_ids.remove(window_id) {
            warn!(
                "Window {} did not hold maintenance on {}",
                window_id, element_key
            );
            return;
        }

        if entry.window_ids.is_empty() {
            let duration = Utc::now().signed_duration_since(entry.flagged_at);
            flagged.remove(element_key);
            info!(
                "Element {} back in service after {}m",
                element_key,
                duration.num_minutes()
            );
        }
    }

    #[inline]
    pub async fn is_in_maintenance(&self, element_key: &str) -> bool {
        let flagged = self.flagged.read().await;
        flagged.contains_key(element_key)
    }
}

impl Clone for MaintenanceTracker {
    fn clone(&self) -> Self {
        Self {
            flagged: self.flagged.clone(),
        }
    }
}

impl Default for MaintenanceTracker {
    fn default() -> Self {
        Self::new()
    }
}
