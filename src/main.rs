use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;

use feedgram::config::Config;
use feedgram::deliver;
use feedgram::storage::Database;
use feedgram::telegram::TelegramClient;

#[derive(Parser, Debug)]
#[command(
    name = "feedgram",
    about = "Posts new RSS/Atom feed items to a Telegram chat"
)]
struct Args {
    /// Override the watermark database path ($DATABASE_PATH, default feedgram.db)
    #[arg(long, value_name = "FILE")]
    database: Option<String>,

    /// Keep running, checking the feed every N seconds instead of exiting
    #[arg(long, value_name = "SECONDS")]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(database) = args.database {
        config.database_path = database;
    }

    let db = Database::open(&config.database_path)
        .await
        .context("failed to open watermark database")?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("failed to build HTTP client")?;
    let telegram = TelegramClient::new(http.clone(), &config);

    match args.interval {
        None => {
            deliver::run_once(&config, &db, &http, &telegram).await?;
        }
        Some(seconds) => {
            let mut interval = tokio::time::interval(Duration::from_secs(seconds.max(1)));
            loop {
                interval.tick().await;
                if let Err(error) = deliver::run_once(&config, &db, &http, &telegram).await {
                    tracing::error!(error = ?error, "Invocation failed");
                }
            }
        }
    }

    Ok(())
}
