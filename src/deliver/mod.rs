//! One invocation of the feed-to-chat pipeline.
//!
//! [`run_once`] wires the pieces together: fetch, select against the
//! stored watermark, render, deliver, advance the watermark.

pub mod render;
pub mod select;

use crate::config::Config;
use crate::feed;
use crate::storage::Database;
use crate::telegram::TelegramClient;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Outcome of one delivery attempt within an invocation.
#[derive(Debug)]
pub struct ItemOutcome {
    pub title: String,
    pub published: DateTime<Utc>,
    /// `None` on success; the send error's message otherwise.
    pub error: Option<String>,
}

/// What a single invocation attempted and where the watermark ended up.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub attempted: Vec<ItemOutcome>,
    pub new_watermark: Option<DateTime<Utc>>,
}

impl DeliveryReport {
    pub fn delivered(&self) -> usize {
        self.attempted
            .iter()
            .filter(|outcome| outcome.error.is_none())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.attempted.len() - self.delivered()
    }
}

/// Runs one invocation: fetch the feed, select the items published after
/// the stored watermark, deliver them oldest first, then advance the
/// watermark.
///
/// A send failure is logged and recorded in the report but stops neither
/// the loop nor the watermark: the watermark advances past every
/// *attempted* item, so an item whose delivery keeps failing is skipped
/// on the next run, not retried. Fetch, watermark-read, and
/// watermark-write errors are fatal to the invocation.
pub async fn run_once(
    config: &Config,
    db: &Database,
    http: &reqwest::Client,
    telegram: &TelegramClient,
) -> Result<DeliveryReport> {
    let feed_url = config.feed_url.as_str();

    let items = feed::fetch_feed(http, feed_url).await?;
    tracing::debug!(feed = feed_url, items = items.len(), "Fetched feed");

    let watermark = db
        .read_watermark(&config.chat_id, feed_url)
        .await
        .context("failed to read watermark")?;

    let selection = select::select_new(items, watermark);
    if selection.items.is_empty() {
        tracing::info!(feed = feed_url, "No new items");
        return Ok(DeliveryReport::default());
    }

    let mut attempted = Vec::with_capacity(selection.items.len());
    for item in &selection.items {
        let text = render::render_message(item);

        let error = match telegram.send_message(&config.chat_id, &text).await {
            Ok(()) => None,
            Err(error) => {
                tracing::error!(
                    chat_id = %config.chat_id,
                    title = %item.title,
                    error = %error,
                    "Failed to deliver item"
                );
                Some(error.to_string())
            }
        };

        attempted.push(ItemOutcome {
            title: item.title.clone(),
            // selected items always carry a publish time
            published: item.published.unwrap_or_default(),
            error,
        });
    }

    let report = DeliveryReport {
        attempted,
        new_watermark: selection.new_watermark,
    };

    if let Some(delivered_at) = report.new_watermark {
        db.write_watermark(&config.chat_id, feed_url, delivered_at)
            .await
            .context("failed to write watermark")?;
    }

    tracing::info!(
        feed = feed_url,
        delivered = report.delivered(),
        failed = report.failed(),
        "Delivery finished"
    );

    Ok(report)
}
