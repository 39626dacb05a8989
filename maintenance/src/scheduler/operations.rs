// File: maintenance/src/scheduler/operations.rs
use crate::constants::scheduler::MAX_SLEEP;
use crate::database::Database;
use crate::errors::MaintenanceError;
use crate::topology::Topology;
use crate::window::{MaintenanceWindow, WindowStatus};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::{Edge, Timer};

/// Side effect queued under the state lock and applied outside it
#[derive(Debug)]
enum Effect {
    Begin(MaintenanceWindow),
    Finish(MaintenanceWindow),
    // Clears flags of a window whose record is already gone
    Release(MaintenanceWindow),
    Persist(MaintenanceWindow),
    Delete(String),
}

#[derive(Default)]
struct SchedulerState {
    windows: HashMap<String, MaintenanceWindow>,
    order: Vec<String>,
    timers: BinaryHeap<Reverse<Timer>>,
    // (window id, edge) -> fire time of the live heap entry
    armed: HashMap<(String, Edge), DateTime<Utc>>,
    effects: VecDeque<Effect>,
}

impl SchedulerState {
    fn arm(&mut self, window_id: &str, edge: Edge, at: DateTime<Utc>) {
        self.armed.insert((window_id.to_string(), edge), at);
        self.timers.push(Reverse(Timer {
            at,
            edge,
            window_id: window_id.to_string(),
        }));
    }

    fn disarm(&mut self, window_id: &str) {
        self.armed.remove(&(window_id.to_string(), Edge::Start));
        self.armed.remove(&(window_id.to_string(), Edge::End));
    }

    fn arm_for_status(&mut self, window: &MaintenanceWindow) {
        match window.status {
            WindowStatus::Pending => {
                self.arm(&window.id, Edge::Start, window.start);
                self.arm(&window.id, Edge::End, window.end);
            }
            WindowStatus::Running => self.arm(&window.id, Edge::End, window.end),
            WindowStatus::Finished | WindowStatus::Cancelled => {}
        }
    }

    fn insert(&mut self, window: MaintenanceWindow) {
        self.arm_for_status(&window);
        self.order.push(window.id.clone());
        self.windows.insert(window.id.clone(), window);
    }

    /// Unregisters a window and disarms its timers.
    fn take(&mut self, window_id: &str) -> Option<MaintenanceWindow> {
        let window = self.windows.remove(window_id)?;
        self.order.retain(|id| id != window_id);
        self.disarm(window_id);
        Some(window)
    }

    fn is_live(&self, timer: &Timer) -> bool {
        self.armed.get(&(timer.window_id.clone(), timer.edge)) == Some(&timer.at)
    }

    /// Earliest live fire time, dropping stale heap entries on the way.
    fn next_fire(&mut self) -> Option<DateTime<Utc>> {
        loop {
            let Reverse(top) = self.timers.peek()?;
            if self.is_live(top) {
                return Some(top.at);
            }
            self.timers.pop();
        }
    }

    fn fire(&mut self, timer: &Timer) {
        self.armed.remove(&(timer.window_id.clone(), timer.edge));
        let Some(window) = self.windows.get_mut(&timer.window_id) else {
            return;
        };

        match (timer.edge, window.status) {
            (Edge::Start, WindowStatus::Pending) => {
                window.status = WindowStatus::Running;
                info!(
                    "Maintenance window {} started ({} items)",
                    window.id,
                    window.items.len()
                );
                self.effects.push_back(Effect::Begin(window.clone()));
            }
            (Edge::End, WindowStatus::Running) => {
                window.status = WindowStatus::Finished;
                info!("Maintenance window {} finished", window.id);
                self.effects.push_back(Effect::Finish(window.clone()));
            }
            (Edge::End, WindowStatus::Pending) => {
                // Start never ran; apply both edges in order
                warn!(
                    "Window {} reached its end before starting, running both edges",
                    window.id
                );
                self.armed.remove(&(timer.window_id.clone(), Edge::Start));
                window.status = WindowStatus::Running;
                self.effects.push_back(Effect::Begin(window.clone()));
                window.status = WindowStatus::Finished;
                self.effects.push_back(Effect::Finish(window.clone()));
            }
            (edge, status) => {
                warn!(
                    "Ignoring {:?} timer for window {} in status {}",
                    edge, window.id, status
                );
            }
        }
    }
}

/// Owner of all maintenance windows and their start/end timers
#[derive(Clone)]
pub struct MaintenanceScheduler {
    state: Arc<Mutex<SchedulerState>>,
    drain_gate: Arc<Mutex<()>>,
    wake: Arc<Notify>,
    topology: Arc<dyn Topology>,
    database: Arc<Database>,
}

impl MaintenanceScheduler {
    pub fn new(topology: Arc<dyn Topology>, database: Arc<Database>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SchedulerState::default())),
            drain_gate: Arc::new(Mutex::new(())),
            wake: Arc::new(Notify::new()),
            topology,
            database,
        }
    }

    /// Re-registers stored windows after a restart.
    ///
    /// Pending windows get both timers back (a start already due fires on the
    /// next tick), running windows re-flag their items and wait for the end.
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<usize> {
        let windows = self.database.load_windows().await?;
        let count = windows.len();

        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            for window in windows {
                if state.windows.contains_key(&window.id) {
                    continue;
                }
                if window.status == WindowStatus::Running {
                    state.effects.push_back(Effect::Begin(window.clone()));
                }
                debug!("Restored window {} ({})", window.id, window.status);
                state.insert(window);
            }
        }

        self.drain_effects().await;
        self.wake.notify_one();
        info!("Restored {} maintenance windows from storage", count);
        Ok(count)
    }

    /// Spawns the control loop that fires due timers.
    pub fn start(&self) -> JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move {
            info!("Maintenance scheduler loop started");
            loop {
                scheduler.tick(Utc::now()).await;

                let delay = match scheduler.next_fire().await {
                    Some(at) => (at - Utc::now())
                        .to_std()
                        .unwrap_or(Duration::ZERO)
                        .min(MAX_SLEEP),
                    None => MAX_SLEEP,
                };

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = scheduler.wake.notified() => {}
                }
            }
        })
    }

    /// Persists and registers a pending window, arming both timers.
    #[instrument(skip(self, window), fields(window_id = %window.id))]
    pub async fn add(&self, window: MaintenanceWindow) -> Result<(), MaintenanceError> {
        if window.status != WindowStatus::Pending {
            return Err(MaintenanceError::InvalidState {
                id: window.id.clone(),
                status: window.status.to_string(),
                action: "scheduling".to_string(),
            });
        }

        if self.state.lock().await.windows.contains_key(&window.id) {
            return Err(MaintenanceError::Other(format!(
                "Maintenance with id {} already exists",
                window.id
            )));
        }

        // Stored first so a storage failure leaves nothing behind
        self.database
            .store_window(&window)
            .await
            .map_err(|e| MaintenanceError::Storage {
                reason: e.to_string(),
            })?;

        info!(
            "Scheduled maintenance window {} from {} to {} ({} items)",
            window.id,
            window.start,
            window.end,
            window.items.len()
        );

        self.state.lock().await.insert(window);
        self.wake.notify_one();
        Ok(())
    }

    pub async fn get(&self, window_id: &str) -> Option<MaintenanceWindow> {
        let state = self.state.lock().await;
        state.windows.get(window_id).cloned()
    }

    /// All registered windows in insertion order.
    pub async fn list(&self) -> Vec<MaintenanceWindow> {
        let state = self.state.lock().await;
        state
            .order
            .iter()
            .filter_map(|id| state.windows.get(id))
            .cloned()
            .collect()
    }

    /// Swaps a pending window for an already validated candidate with the same id.
    #[instrument(skip(self, window), fields(window_id = %window.id))]
    pub async fn replace(&self, window: MaintenanceWindow) -> Result<(), MaintenanceError> {
        {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let current = state
                .windows
                .get_mut(&window.id)
                .ok_or_else(|| MaintenanceError::not_found(&window.id))?;

            if current.status != WindowStatus::Pending {
                return Err(MaintenanceError::InvalidState {
                    id: window.id.clone(),
                    status: current.status.to_string(),
                    action: "updating".to_string(),
                });
            }

            let mut updated = window;
            updated.status = WindowStatus::Pending;
            *current = updated.clone();

            state.disarm(&updated.id);
            state.arm_for_status(&updated);
            info!(
                "Rescheduled maintenance window {} from {} to {}",
                updated.id, updated.start, updated.end
            );
            state.effects.push_back(Effect::Persist(updated));
        }

        self.wake.notify_one();
        self.drain_effects().await;
        Ok(())
    }

    /// Retires a window. A pending window is cancelled without touching the
    /// topology; a running one releases its items first.
    ///
    /// The stored record is deleted before the window is unregistered, so a
    /// storage failure leaves it scheduled and is reported to the caller.
    #[instrument(skip(self))]
    pub async fn remove(&self, window_id: &str) -> Result<MaintenanceWindow, MaintenanceError> {
        let window = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            if !state.windows.contains_key(window_id) {
                return Err(MaintenanceError::not_found(window_id));
            }

            // Held across the delete so no timer fires in between
            self.database
                .delete_window(window_id)
                .await
                .map_err(|e| MaintenanceError::Storage {
                    reason: e.to_string(),
                })?;

            let mut window = state
                .take(window_id)
                .ok_or_else(|| MaintenanceError::not_found(window_id))?;

            match window.status {
                WindowStatus::Pending => {
                    window.status = WindowStatus::Cancelled;
                    info!("Cancelled pending maintenance window {}", window_id);
                }
                WindowStatus::Running => {
                    window.status = WindowStatus::Finished;
                    info!("Removing running maintenance window {}, releasing items", window_id);
                    state.effects.push_back(Effect::Release(window.clone()));
                }
                WindowStatus::Finished | WindowStatus::Cancelled => {
                    info!("Removed {} maintenance window {}", window.status, window_id);
                }
            }

            window
        };

        self.wake.notify_one();
        self.drain_effects().await;
        Ok(window)
    }

    /// Finishes a running window now; its start and end stay as declared.
    #[instrument(skip(self))]
    pub async fn end_now(&self, window_id: &str) -> Result<MaintenanceWindow, MaintenanceError> {
        let window = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let window = state
                .windows
                .get_mut(window_id)
                .ok_or_else(|| MaintenanceError::not_found(window_id))?;

            if window.status != WindowStatus::Running {
                return Err(MaintenanceError::InvalidState {
                    id: window_id.to_string(),
                    status: window.status.to_string(),
                    action: "ending".to_string(),
                });
            }

            window.status = WindowStatus::Finished;
            let snapshot = window.clone();
            state.disarm(window_id);
            info!("Maintenance window {} ended early", window_id);
            state.effects.push_back(Effect::Finish(snapshot.clone()));
            snapshot
        };

        self.wake.notify_one();
        self.drain_effects().await;
        Ok(window)
    }

    /// Drops finished windows whose end lies before `cutoff`.
    pub async fn purge_finished(&self, cutoff: DateTime<Utc>) -> usize {
        let purged = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let expired: Vec<String> = state
                .order
                .iter()
                .filter(|id| {
                    state
                        .windows
                        .get(*id)
                        .map(|w| w.status == WindowStatus::Finished && w.end < cutoff)
                        .unwrap_or(false)
                })
                .cloned()
                .collect();

            for id in &expired {
                state.take(id);
                state.effects.push_back(Effect::Delete(id.clone()));
            }
            expired.len()
        };

        if purged > 0 {
            self.drain_effects().await;
        }
        purged
    }

    pub async fn next_fire(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.next_fire()
    }

    /// Fires every timer due at `now` and applies the resulting effects.
    pub async fn tick(&self, now: DateTime<Utc>) -> usize {
        let fired = self.process_due(now).await;
        self.drain_effects().await;
        fired
    }

    async fn process_due(&self, now: DateTime<Utc>) -> usize {
        let mut state = self.state.lock().await;
        let mut fired = 0;

        while let Some(at) = state.next_fire() {
            if at > now {
                break;
            }
            let Some(Reverse(timer)) = state.timers.pop() else {
                break;
            };
            state.fire(&timer);
            fired += 1;
        }

        if fired > 0 {
            debug!("Fired {} maintenance timers", fired);
        }
        fired
    }

    /// Applies queued effects in order. Only one drainer runs at a time.
    async fn drain_effects(&self) -> usize {
        let _gate = self.drain_gate.lock().await;
        let mut applied = 0;

        loop {
            let next = self.state.lock().await.effects.pop_front();
            let Some(effect) = next else {
                break;
            };
            self.apply(effect).await;
            applied += 1;
        }

        applied
    }

    async fn apply(&self, effect: Effect) {
        match effect {
            Effect::Begin(window) => {
                for item in &window.items {
                    if let Err(e) = self.topology.set_under_maintenance(item, &window.id).await {
                        error!(
                            "Failed to put {} under maintenance for window {}: {}",
                            item, window.id, e
                        );
                    }
                }
                self.persist(&window).await;
            }
            Effect::Finish(window) => {
                self.release(&window).await;
                self.persist(&window).await;
            }
            Effect::Release(window) => self.release(&window).await,
            Effect::Persist(window) => self.persist(&window).await,
            Effect::Delete(window_id) => {
                if let Err(e) = self.database.delete_window(&window_id).await {
                    error!("Failed to delete maintenance window {}: {}", window_id, e);
                }
            }
        }
    }

    async fn release(&self, window: &MaintenanceWindow) {
        for item in &window.items {
            if let Err(e) = self.topology.clear_under_maintenance(item, &window.id).await {
                error!(
                    "Failed to release {} from maintenance window {}: {}",
                    item, window.id, e
                );
            }
        }
    }

    /// Writes status or schedule changes; never recreates a removed record.
    async fn persist(&self, window: &MaintenanceWindow) {
        match self.database.update_window(window).await {
            Ok(true) => {}
            Ok(false) => debug!("Window {} no longer stored, skipping write", window.id),
            Err(e) => error!(
                "Failed to persist maintenance window {} ({}): {}",
                window.id, window.status, e
            ),
        }
    }
}
