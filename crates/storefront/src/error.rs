//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. Route handlers return `Result<T, AppError>`
//! unless they re-render a page on failure (checkout does).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use telecart_core::CartError;
use thiserror::Error;

use crate::routes::hx_trigger;
use crate::shop::ShopError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// The request does not fit the cart or catalog.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Local persistence failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<ShopError> for AppError {
    fn from(err: ShopError) -> Self {
        match err {
            ShopError::Cart(e) => Self::Cart(e),
            ShopError::Storage(e) => Self::Storage(e),
        }
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Cart(CartError::UnknownProduct(_)) => StatusCode::NOT_FOUND,
            Self::Cart(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Text safe to show the customer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) => "Something went wrong. Please try again.".to_string(),
            Self::Cart(CartError::UnknownProduct(_)) => "That product is not available.".to_string(),
            Self::Cart(_) => "That cart change is not allowed.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Storage(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, "Client error");
        }

        // The toast header lets HTMX callers surface the failure without a swap.
        let message = self.user_message();
        (self.status(), hx_trigger(Some(&message), false), message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
