//! Environment-backed configuration.
//!
//! All settings are read once per process. Each of the three required
//! variables produces its own error naming the variable, so a
//! misconfigured deployment fails fast with an actionable message.

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

pub const FEED_URL_VAR: &str = "RSS_FEED_URL";
pub const BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_API_TOKEN";
pub const CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";
pub const DATABASE_PATH_VAR: &str = "DATABASE_PATH";
pub const TELEGRAM_BASE_URL_VAR: &str = "TELEGRAM_BASE_URL";

const DEFAULT_DATABASE_PATH: &str = "feedgram.db";
const DEFAULT_TELEGRAM_BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable RSS_FEED_URL not set")]
    MissingFeedUrl,

    #[error("environment variable TELEGRAM_BOT_API_TOKEN not set")]
    MissingBotToken,

    #[error("environment variable TELEGRAM_CHAT_ID not set")]
    MissingChatId,

    #[error("RSS_FEED_URL is not a valid URL: {0}")]
    InvalidFeedUrl(#[from] url::ParseError),
}

/// Runtime configuration for one process.
///
/// The bot token is held as a [`SecretString`] so `{:?}` output (logs,
/// error contexts) never contains it.
#[derive(Debug)]
pub struct Config {
    pub feed_url: Url,
    pub bot_token: SecretString,
    pub chat_id: String,
    pub database_path: String,
    /// Overridable for tests and self-hosted Bot API servers.
    pub telegram_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source. Empty values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let feed_url = get(FEED_URL_VAR).ok_or(ConfigError::MissingFeedUrl)?;
        let bot_token = get(BOT_TOKEN_VAR).ok_or(ConfigError::MissingBotToken)?;
        let chat_id = get(CHAT_ID_VAR).ok_or(ConfigError::MissingChatId)?;

        Ok(Config {
            feed_url: Url::parse(&feed_url)?,
            bot_token: SecretString::from(bot_token),
            chat_id,
            database_path: get(DATABASE_PATH_VAR)
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            telegram_base_url: get(TELEGRAM_BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_TELEGRAM_BASE_URL.to_string()),
        })
    }
}
