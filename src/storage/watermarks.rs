use anyhow::Result;
use chrono::{DateTime, Utc};

use super::schema::Database;

impl Database {
    /// Returns the publish time of the newest item already delivered for
    /// this (chat, feed URL) pair, or `None` if nothing was delivered yet.
    ///
    /// A missing row, a NULL value, and a stored value outside the
    /// representable range all read as `None` — only backend failures
    /// are errors.
    pub async fn read_watermark(
        &self,
        chat_id: &str,
        feed_url: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let row: Option<(Option<i64>,)> = sqlx::query_as(
            "SELECT last_delivered_at FROM watermarks WHERE chat_id = ? AND feed_url = ?",
        )
        .bind(chat_id)
        .bind(feed_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .and_then(|(seconds,)| seconds)
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0)))
    }

    /// Upserts the watermark for a (chat, feed URL) pair, creating the row
    /// on first delivery. Watermarks for other feeds under the same chat
    /// are untouched.
    pub async fn write_watermark(
        &self,
        chat_id: &str,
        feed_url: &str,
        delivered_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO watermarks (chat_id, feed_url, last_delivered_at)
            VALUES (?, ?, ?)
            ON CONFLICT(chat_id, feed_url)
            DO UPDATE SET last_delivered_at = excluded.last_delivered_at
        "#,
        )
        .bind(chat_id)
        .bind(feed_url)
        .bind(delivered_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
