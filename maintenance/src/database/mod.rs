//! Database layer for the maintenance scheduler.
//!
//! SQLite persistence for maintenance windows so pending and running windows
//! can be re-armed after a restart. Window operations live in `windows`.

mod windows;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;
use tracing::{error, info};

pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn new(database_path: &str) -> Result<Self> {
        info!("Database path: {}", database_path);

        if let Some(parent) = Path::new(database_path).parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!("FAILED to create parent directory {:?}: {}", parent, e);
                return Err(e.into());
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = match SqlitePool::connect(&database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                error!("FAILED to connect to database {}: {}", database_url, e);
                return Err(e.into());
            }
        };

        let database = Self { pool };
        database.initialize_tables().await?;
        info!("Database initialized");
        Ok(database)
    }

    /// Private in-memory database; a single connection keeps one shared schema.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let database = Self { pool };
        database.initialize_tables().await?;
        Ok(database)
    }

    async fn initialize_tables(&self) -> Result<()> {
        let windows_table_sql = r#"
            CREATE TABLE IF NOT EXISTS maintenance_windows (
                id TEXT PRIMARY KEY,
                start_at DATETIME NOT NULL,
                end_at DATETIME NOT NULL,
                items TEXT NOT NULL,
                status TEXT NOT NULL,
                updated_at DATETIME NOT NULL
            )
        "#;

        if let Err(e) = sqlx::query(windows_table_sql).execute(&self.pool).await {
            error!("FAILED to create maintenance_windows table: {}", e);
            return Err(e.into());
        }

        let status_index_sql =
            "CREATE INDEX IF NOT EXISTS idx_windows_status ON maintenance_windows(status, end_at)";
        if let Err(e) = sqlx::query(status_index_sql).execute(&self.pool).await {
            error!("FAILED to create maintenance_windows index: {}", e);
            return Err(e.into());
        }

        Ok(())
    }
}
