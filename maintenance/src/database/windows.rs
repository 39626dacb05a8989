//! Maintenance window database operations.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;

use super::Database;
use crate::window::{ItemRef, MaintenanceWindow, WindowStatus};

impl Database {
    /// Inserts or updates a window. Updates keep the row position so listing
    /// order is stable across restarts.
    pub async fn store_window(&self, window: &MaintenanceWindow) -> Result<()> {
        debug!("Storing maintenance window: {} ({})", window.id, window.status);

        let items = serde_json::to_string(&window.items)?;

        match sqlx::query(
            r#"
            INSERT INTO maintenance_windows (id, start_at, end_at, items, status, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                start_at = excluded.start_at,
                end_at = excluded.end_at,
                items = excluded.items,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&window.id)
        .bind(window.start)
        .bind(window.end)
        .bind(&items)
        .bind(window.status.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!("Failed to store maintenance window {}: {}", window.id, e);
                Err(e.into())
            }
        }
    }

    /// Rewrites an existing window. Returns false when the row is gone, which
    /// happens when the window was removed while the write was queued.
    pub async fn update_window(&self, window: &MaintenanceWindow) -> Result<bool> {
        let items = serde_json::to_string(&window.items)?;

        let result = sqlx::query(
            r#"
            UPDATE maintenance_windows
            SET start_at = ?, end_at = ?, items = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .bind(&items)
        .bind(window.status.as_str())
        .bind(Utc::now())
        .bind(&window.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_window(&self, window_id: &str) -> Result<Option<MaintenanceWindow>> {
        let row = sqlx::query(
            r#"
            SELECT id, start_at, end_at, items, status
            FROM maintenance_windows
            WHERE id = ?
            "#,
        )
        .bind(window_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| window_from_row(&row)).transpose()
    }

    /// All stored windows in insertion order.
    pub async fn load_windows(&self) -> Result<Vec<MaintenanceWindow>> {
        let rows = sqlx::query(
            r#"
            SELECT id, start_at, end_at, items, status
            FROM maintenance_windows
            ORDER BY rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(window_from_row).collect()
    }

    pub async fn delete_window(&self, window_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM maintenance_windows WHERE id = ?")
            .bind(window_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn window_from_row(row: &SqliteRow) -> Result<MaintenanceWindow> {
    let id: String = row.try_get("id")?;
    let items: String = row.try_get("items")?;
    let status: String = row.try_get("status")?;
    let start: DateTime<Utc> = row.try_get("start_at")?;
    let end: DateTime<Utc> = row.try_get("end_at")?;

    let items: Vec<ItemRef> = serde_json::from_str(&items)
        .map_err(|e| anyhow!("Corrupt items for window {}: {}", id, e))?;

    Ok(MaintenanceWindow {
        id,
        start,
        end,
        items,
        status: status.parse::<WindowStatus>()?,
    })
}
