//! Maintenance window entity
//!
//! A window is built only through [`MaintenanceWindow::from_request`] (or the
//! update path derived from it), which resolves every item and parses the
//! fixed-format timestamps. Temporal checks live in [`validation`] so callers
//! can report the specific reason after construction.

pub mod items;
pub mod validation;

pub use items::{ItemRef, Tag, TagType};

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::time::TIME_FMT;
use crate::errors::ValidationError;
use crate::topology::ItemResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowStatus {
    Pending,
    Running,
    Finished,
    Cancelled,
}

impl WindowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowStatus::Pending => "pending",
            WindowStatus::Running => "running",
            WindowStatus::Finished => "finished",
            WindowStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(WindowStatus::Pending),
            "running" => Ok(WindowStatus::Running),
            "finished" => Ok(WindowStatus::Finished),
            "cancelled" => Ok(WindowStatus::Cancelled),
            other => Err(anyhow::anyhow!("Unknown window status: {}", other)),
        }
    }
}

/// Body of a create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub items: Vec<Value>,
}

/// Body of an update request; absent fields keep their current value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub start: Option<String>,
    pub end: Option<String>,
    pub items: Option<Vec<Value>>,
}

/// What the query surface returns for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub id: String,
    pub start: String,
    pub end: String,
    pub items: Vec<Value>,
    pub status: WindowStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub items: Vec<ItemRef>,
    pub status: WindowStatus,
}

impl MaintenanceWindow {
    /// New pending window with a fresh id. Does not validate.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, items: Vec<ItemRef>) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            start,
            end,
            items,
            status: WindowStatus::Pending,
        }
    }

    /// Resolves items and parses timestamps; items are checked first.
    pub async fn from_request(
        request: &MaintenanceRequest,
        resolver: &ItemResolver,
        tz: Tz,
    ) -> Result<Self, ValidationError> {
        let items = validation::check_items(resolver.resolve_all(&request.items).await)?;
        let start = parse_timestamp("start", &request.start, tz)?;
        let end = parse_timestamp("end", &request.end, tz)?;
        Ok(Self::new(start, end, items))
    }

    /// Candidate replacing this window, keeping id and status.
    pub async fn with_changes(
        &self,
        changes: &UpdateRequest,
        resolver: &ItemResolver,
        tz: Tz,
    ) -> Result<Self, ValidationError> {
        let items = match &changes.items {
            Some(raw) => validation::check_items(resolver.resolve_all(raw).await)?,
            None => self.items.clone(),
        };
        let start = match &changes.start {
            Some(value) => parse_timestamp("start", value, tz)?,
            None => self.start,
        };
        let end = match &changes.end {
            Some(value) => parse_timestamp("end", value, tz)?,
            None => self.end,
        };
        Ok(Self {
            id: self.id.clone(),
            start,
            end,
            items,
            status: self.status,
        })
    }

    pub fn summary(&self, tz: Tz) -> WindowSummary {
        WindowSummary {
            id: self.id.clone(),
            start: format_timestamp(self.start, tz),
            end: format_timestamp(self.end, tz),
            items: self.items.iter().map(ItemRef::to_payload).collect(),
            status: self.status,
        }
    }
}

/// Reads a fixed-format local timestamp in `tz`.
///
/// Ambiguous local times resolve to the earlier instant; times skipped by a
/// DST jump are rejected.
pub fn parse_timestamp(
    field: &str,
    value: &str,
    tz: Tz,
) -> Result<DateTime<Utc>, ValidationError> {
    let invalid = || ValidationError::InvalidTimestamp {
        field: field.to_string(),
        value: value.to_string(),
    };

    let naive = NaiveDateTime::parse_from_str(value, TIME_FMT).map_err(|_| invalid())?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(invalid()),
    }
}

pub fn format_timestamp(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(TIME_FMT).to_string()
}
