use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Open a database connection pool and run migrations.
    pub async fn open(path: &str) -> Result<Self> {
        let url = format!("sqlite:{}?mode=rwc", path);

        // busy_timeout=5000: SQLite waits up to 5 seconds for locks to
        // release before returning SQLITE_BUSY, so an overlapping
        // invocation degrades to waiting instead of failing.
        let options = SqliteConnectOptions::from_str(&url)?.pragma("busy_timeout", "5000");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations. `IF NOT EXISTS` keeps re-runs idempotent.
    async fn migrate(&self) -> Result<()> {
        // last_delivered_at is nullable: a row whose value is missing
        // reads back as "never delivered" rather than failing the run.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS watermarks (
                chat_id TEXT NOT NULL,
                feed_url TEXT NOT NULL,
                last_delivered_at INTEGER,
                PRIMARY KEY (chat_id, feed_url)
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
