//! Telegram Bot API integration for order notifications.
//!
//! This module provides:
//! - [`TelegramClient`] for sending messages to a chat
//! - Request/response types for `sendMessage`
//!
//! Only the one call the storefront needs is implemented.

mod client;
mod error;
mod types;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use types::{ApiResponse, ParseMode, SendMessage};
