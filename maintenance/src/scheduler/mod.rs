//! Timer-driven scheduling of maintenance windows
//!
//! Each registered window owns two timers, one per edge:
//!
//! ```text
//! pending --(start fires)--> running --(end fires)--> finished
//! pending --(remove)--> cancelled
//! ```
//!
//! # Design
//!
//! - **Single owner**: the window map, insertion order, timer heap and armed
//!   set live behind one lock inside [`MaintenanceScheduler`]
//! - **Min-heap timers**: fire times are processed in increasing order; for a
//!   shared instant the start edge sorts before the end edge
//! - **Lazy disarm**: disarming drops the key from the armed set and stale heap
//!   entries are skipped when popped
//! - **Queued side effects**: topology flags and storage writes are queued under
//!   the lock and applied in FIFO order by one drainer, so a window's start
//!   effects always land before its end effects
//! - **Best effort**: a failing topology or storage call is logged and the
//!   window status still advances
//!
//! Finished windows can be purged on a 6-field cron schedule, see [`retention`].

pub mod operations;
pub mod retention;
pub use operations::MaintenanceScheduler;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Edge {
    Start,
    End,
}

/// Heap entry; field order gives time, then edge, then id ordering
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Timer {
    pub at: DateTime<Utc>,
    pub edge: Edge,
    pub window_id: String,
}
