//! Pure checks applied to a candidate window before it is accepted.
//!
//! Checks run in a fixed order and stop at the first failure:
//! 1. every item resolved (and there is at least one)
//! 2. start is not before now
//! 3. end is after start

use chrono::{DateTime, SubsecRound, Utc};
use std::collections::HashSet;

use super::items::ItemRef;
use crate::errors::{InvalidItem, ValidationError};

/// Collapses resolution results into the window's item list.
///
/// Exact duplicates (same element key) keep their first position.
pub fn check_items(
    resolved: Vec<Result<ItemRef, InvalidItem>>,
) -> Result<Vec<ItemRef>, ValidationError> {
    if resolved.is_empty() {
        return Err(ValidationError::NoItems);
    }

    let (items, failures): (Vec<_>, Vec<_>) = resolved.into_iter().partition(|r| r.is_ok());
    if !failures.is_empty() {
        return Err(ValidationError::InvalidItems(
            failures.into_iter().filter_map(|r| r.err()).collect(),
        ));
    }

    let mut seen = HashSet::new();
    Ok(items
        .into_iter()
        .filter_map(|r| r.ok())
        .filter(|item| seen.insert(item.element_key()))
        .collect())
}

/// Start may equal the current second but not precede it.
pub fn check_start(start: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), ValidationError> {
    if start < now.trunc_subsecs(0) {
        return Err(ValidationError::StartInPast);
    }
    Ok(())
}

pub fn check_end(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::EndBeforeStart);
    }
    Ok(())
}

pub fn check_schedule(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), ValidationError> {
    check_start(start, now)?;
    check_end(start, end)
}
