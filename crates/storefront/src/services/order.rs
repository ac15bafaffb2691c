//! Order submission: message formatting and the submission state machine.
//!
//! An order is one Telegram message built from the cart, the customer's
//! contact details, and an optional free-text note. The flow itself lives in
//! [`crate::shop::Shop::submit_order`]; this module holds the pieces it is
//! built from.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;
use telecart_core::{Cart, ContactInfo, format_amount};
use thiserror::Error;

use crate::catalog::StoreConfig;
use crate::telegram::TelegramError;

/// Shown when checkout is attempted with an empty cart.
pub const EMPTY_CART_NOTICE: &str = "Your cart is empty!";

/// Shown when the order could not be delivered.
pub const DELIVERY_FAILED_NOTICE: &str = "Error sending order. Please contact us directly.";

/// Shown after a successful order.
pub const ORDER_PLACED_NOTICE: &str = "Order placed successfully!";

/// Shown when a submission is already in flight.
pub const ALREADY_SENDING_NOTICE: &str = "Your order is already being sent.";

/// Placeholder for blank optional contact fields.
const NOT_PROVIDED: &str = "N/A";

/// Placeholder for a blank order note.
const NO_MESSAGE: &str = "No message";

/// Errors that can end an order submission.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart has no lines; nothing was sent.
    #[error("cart is empty")]
    EmptyCart,

    /// A required contact field is blank; nothing was sent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Another submission is in flight.
    #[error("an order is already being sent")]
    AlreadySending,

    /// The message could not be delivered.
    #[error("order delivery failed: {0}")]
    Delivery(#[from] TelegramError),
}

impl OrderError {
    /// Text safe to show the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => EMPTY_CART_NOTICE.to_string(),
            Self::MissingField(field) => format!("Please enter your {field}."),
            Self::AlreadySending => ALREADY_SENDING_NOTICE.to_string(),
            Self::Delivery(_) => DELIVERY_FAILED_NOTICE.to_string(),
        }
    }
}

/// Checkout form as submitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub social: String,
    /// Free-text note for this order only. Never persisted.
    pub message: String,
}

impl OrderForm {
    /// Pre-fill a form from saved contact details, with an empty message.
    #[must_use]
    pub fn from_contact(info: &ContactInfo) -> Self {
        Self {
            name: info.name.clone(),
            phone: info.phone.clone(),
            email: info.email.clone(),
            social: info.social.clone(),
            message: String::new(),
        }
    }

    /// The persistable part of the form.
    #[must_use]
    pub fn contact_info(&self) -> ContactInfo {
        ContactInfo {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            social: self.social.clone(),
        }
        .trimmed()
    }

    /// Check the fields an order cannot go out without.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::MissingField`] for a blank name or phone.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.name.trim().is_empty() {
            return Err(OrderError::MissingField("name"));
        }
        if self.phone.trim().is_empty() {
            return Err(OrderError::MissingField("phone"));
        }
        Ok(())
    }
}

// =============================================================================
// Message formatting
// =============================================================================

/// Escape text for Telegram legacy Markdown.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        placeholder.to_string()
    } else {
        escape_markdown(value)
    }
}

/// Build the order notification text.
///
/// Every line between the header and footer starts with the `│` rail,
/// including each line of a multi-line customer message.
#[must_use]
pub fn format_order_message(
    config: &StoreConfig,
    contact: &ContactInfo,
    message: &str,
    cart: &Cart,
) -> String {
    let symbol = config.currency_symbol.as_str();

    let mut lines = vec![
        "╭──⦿【 ⚡ NEW ORDER ALERT 】".to_string(),
        format!("│ 🏪 Business : {}", escape_markdown(&config.business_name)),
        "│".to_string(),
        format!("│ 👤 Customer : {}", or_placeholder(&contact.name, NOT_PROVIDED)),
        format!("│ 📞 Phone    : {}", or_placeholder(&contact.phone, NOT_PROVIDED)),
        format!("│ 📧 Email    : {}", or_placeholder(&contact.email, NOT_PROVIDED)),
        format!("│ 💬 Social   : {}", or_placeholder(&contact.social, NOT_PROVIDED)),
        "│".to_string(),
        "│ 📝 Message :".to_string(),
    ];

    let message = message.trim();
    if message.is_empty() {
        lines.push(format!("│ {NO_MESSAGE}"));
    } else {
        lines.extend(message.lines().map(|line| format!("│ {}", escape_markdown(line))));
    }

    lines.push("│".to_string());
    lines.push("│ 🛒 Items :".to_string());
    lines.extend(cart.lines().iter().map(|line| {
        format!(
            "│ - {} ×{} ({})",
            escape_markdown(&line.product.name),
            line.quantity(),
            format_amount(symbol, line.subtotal())
        )
    }));
    lines.push("│".to_string());
    lines.push(format!("│ 💰 Total : {}", cart.display_total(symbol)));
    lines.push("╰────────⦿".to_string());

    lines.join("\n")
}

// =============================================================================
// Submission state
// =============================================================================

/// Where the checkout button is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Sending,
}

/// Tracks whether an order is in flight.
#[derive(Debug, Default)]
pub struct SubmissionState {
    sending: AtomicBool,
}

impl SubmissionState {
    /// Move from `Idle` to `Sending`.
    ///
    /// Returns `None` if already sending. The phase returns to `Idle` when the
    /// guard drops, whatever the outcome.
    #[must_use]
    pub fn begin(&self) -> Option<SendingGuard<'_>> {
        self.sending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SendingGuard {
                sending: &self.sending,
            })
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        if self.sending.load(Ordering::Acquire) {
            SubmissionPhase::Sending
        } else {
            SubmissionPhase::Idle
        }
    }
}

/// Holds the `Sending` phase; resets to `Idle` on drop.
#[derive(Debug)]
pub struct SendingGuard<'a> {
    sending: &'a AtomicBool,
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        self.sending.store(false, Ordering::Release);
    }
}
