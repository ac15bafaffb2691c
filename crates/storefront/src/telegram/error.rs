//! Telegram-related errors.

use thiserror::Error;

/// Errors that can occur when talking to the Telegram Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// HTTP request failed before a response arrived.
    #[error("Telegram request failed: {0}")]
    Request(String),

    /// Telegram answered with a non-success status.
    #[error("Telegram API returned {status}: {description}")]
    Api { status: u16, description: String },
}
