// File: maintenance/src/scheduler/retention.rs
use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

use super::MaintenanceScheduler;

/// Cron job purging finished windows older than the retention period
pub struct RetentionJob {
    scheduler: JobScheduler,
}

impl RetentionJob {
    pub async fn start(
        maintenance: MaintenanceScheduler,
        schedule: &str,
        retention_hours: u32,
    ) -> Result<Self> {
        validate_6_field_cron(schedule)
            .map_err(|e| anyhow!("Invalid 6-field cron schedule '{}': {}", schedule, e))?;

        let scheduler = JobScheduler::new().await
            .map_err(|e| anyhow!("Failed to create JobScheduler: {}", e))?;

        let job = Job::new_async(schedule, move |_uuid, _scheduler| {
            let maintenance = maintenance.clone();

            Box::pin(async move {
                let Some(cutoff) = retention_cutoff(Utc::now(), retention_hours) else {
                    warn!(
                        "Retention of {} hours reaches past the earliest date, nothing to purge",
                        retention_hours
                    );
                    return;
                };
                let purged = maintenance.purge_finished(cutoff).await;
                if purged > 0 {
                    warn!(
                        "Purged {} finished maintenance windows older than {} hours",
                        purged, retention_hours
                    );
                }
            })
        })
        .map_err(|e| anyhow!("Failed to create retention job for '{}': {}", schedule, e))?;

        scheduler.add(job).await
            .map_err(|e| anyhow!("Failed to add retention job to scheduler: {}", e))?;
        scheduler.start().await
            .map_err(|e| anyhow!("Failed to start retention scheduler: {}", e))?;

        info!(
            "Retention job scheduled: '{}' keeping {}h of finished windows",
            schedule, retention_hours
        );
        Ok(Self { scheduler })
    }

    pub async fn shutdown(mut self) -> Result<()> {
        self.scheduler.shutdown().await
            .map_err(|e| anyhow!("Failed to stop retention scheduler: {}", e))
    }
}

/// Finished windows ending before the returned instant are purged. `None`
/// when the period reaches before the earliest representable date.
pub fn retention_cutoff(now: DateTime<Utc>, retention_hours: u32) -> Option<DateTime<Utc>> {
    now.checked_sub_signed(Duration::hours(i64::from(retention_hours)))
}

/// tokio-cron-scheduler expects `sec min hour day month dow`.
pub fn validate_6_field_cron(schedule: &str) -> Result<()> {
    const FIELDS: [(&str, u32, u32); 6] = [
        ("second", 0, 59),
        ("minute", 0, 59),
        ("hour", 0, 23),
        ("day", 1, 31),
        ("month", 1, 12),
        ("dayofweek", 0, 7),
    ];

    let parts: Vec<&str> = schedule.split_whitespace().collect();
    if parts.len() != FIELDS.len() {
        return Err(anyhow!(
            "expected 6 fields (sec min hour day month dow), got {}",
            parts.len()
        ));
    }

    for (part, (name, min, max)) in parts.iter().zip(FIELDS) {
        for term in part.split(',') {
            check_cron_term(term, min, max)
                .map_err(|e| anyhow!("{} field '{}': {}", name, part, e))?;
        }
    }
    Ok(())
}

/// One list element: `*`, `?`, `n` or `a-b`, optionally followed by `/step`.
fn check_cron_term(term: &str, min: u32, max: u32) -> Result<()> {
    let (base, step) = match term.split_once('/') {
        Some((base, step)) => (base, Some(step)),
        None => (term, None),
    };

    if let Some(step) = step {
        let step: u32 = step.parse().map_err(|_| anyhow!("bad step '{}'", step))?;
        if step == 0 {
            return Err(anyhow!("step must be positive"));
        }
    }

    if base == "*" || base == "?" {
        return Ok(());
    }

    let bound = |value: &str| -> Result<u32> {
        let value: u32 = value.parse().map_err(|_| anyhow!("bad value '{}'", value))?;
        if value < min || value > max {
            return Err(anyhow!("{} outside {}-{}", value, min, max));
        }
        Ok(value)
    };

    match base.split_once('-') {
        Some((low, high)) => {
            if bound(low)? > bound(high)? {
                return Err(anyhow!("range '{}' is reversed", base));
            }
        }
        None => {
            bound(base)?;
        }
    }
    Ok(())
}
