//! Telegram Bot API client.
//!
//! Sends text messages to a single configured chat.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, instrument};
use url::Url;

use super::error::TelegramError;
use super::types::{ApiResponse, ParseMode, SendMessage};
use crate::catalog::TelegramCredentials;

/// Bot API client bound to one bot and one chat.
#[derive(Clone)]
pub struct TelegramClient {
    /// HTTP client.
    client: Client,
    /// `sendMessage` URL; contains the bot token.
    send_message_url: SecretString,
    /// Chat that receives messages.
    chat_id: String,
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("send_message_url", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

impl TelegramClient {
    /// Create a new client.
    ///
    /// `api_base` is normally `https://api.telegram.org`.
    #[must_use]
    pub fn new(client: Client, api_base: &Url, credentials: &TelegramCredentials) -> Self {
        let send_message_url = format!(
            "{}/bot{}/sendMessage",
            api_base.as_str().trim_end_matches('/'),
            credentials.bot_token.expose_secret()
        );

        Self {
            client,
            send_message_url: SecretString::from(send_message_url),
            chat_id: credentials.chat_id.clone(),
        }
    }

    /// Send `text` to the configured chat, formatted as legacy Markdown.
    ///
    /// Any 2xx response counts as delivered. No retries are attempted.
    ///
    /// # Errors
    ///
    /// Returns [`TelegramError::Request`] if the request could not be sent and
    /// [`TelegramError::Api`] for a non-success status.
    #[instrument(skip(self, text), fields(chat_id = %self.chat_id, len = text.len()))]
    pub async fn send_message(&self, text: &str) -> Result<(), TelegramError> {
        let body = SendMessage {
            chat_id: self.chat_id.clone(),
            text: text.to_string(),
            parse_mode: ParseMode::Markdown,
        };

        let response = self
            .client
            .post(self.send_message_url.expose_secret())
            .json(&body)
            .send()
            .await
            // reqwest errors include the URL, which carries the bot token
            .map_err(|e| TelegramError::Request(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let description = response
                .json::<ApiResponse>()
                .await
                .ok()
                .and_then(|r| r.description)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());
            error!(status = status.as_u16(), %description, "Telegram API error sending message");
            return Err(TelegramError::Api {
                status: status.as_u16(),
                description,
            });
        }

        debug!("Message sent to Telegram");
        Ok(())
    }
}
