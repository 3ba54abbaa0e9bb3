//! Delivery client for the Telegram Bot API `sendMessage` endpoint.

use crate::config::Config;
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Anything other than HTTP 200 from the Bot API
    #[error("telegram error: status {status}: {description}")]
    Api { status: u16, description: String },
}

/// Subset of Telegram's error payload; the rest of the body is ignored.
#[derive(Deserialize)]
struct ApiErrorResponse {
    description: String,
}

/// Sends text messages to one Telegram chat.
///
/// Holds the shared HTTP client and the resolved `sendMessage` URL. The
/// base URL comes from config so tests and self-hosted Bot API servers
/// can point it elsewhere.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    send_message_url: String,
}

impl TelegramClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        let send_message_url = format!(
            "{}/bot{}/sendMessage",
            config.telegram_base_url.trim_end_matches('/'),
            config.bot_token.expose_secret(),
        );

        Self {
            http,
            send_message_url,
        }
    }

    /// Sends one already-rendered message to the chat.
    ///
    /// Exactly HTTP 200 is success. Any other status is an error carrying
    /// the status code and Telegram's `description` when the error payload
    /// decodes, or the raw response body when it does not.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), SendError> {
        let params = [
            ("chat_id", chat_id),
            ("text", text),
            ("parse_mode", "Markdown"),
            ("disable_web_page_preview", "true"),
        ];

        let response = self
            .http
            .post(&self.send_message_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::OK {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|payload| payload.description)
            .unwrap_or(body);

        Err(SendError::Api {
            status: status.as_u16(),
            description,
        })
    }
}
