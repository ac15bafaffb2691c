//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog (product grid)
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one unit (returns count badge, triggers cart-updated)
//! POST /cart/update            - Adjust quantity by delta (returns cart_items fragment)
//! POST /cart/clear             - Clear cart (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Checkout form, pre-filled from saved contact info
//! POST /checkout               - Submit order to Telegram
//! POST /checkout/forget        - Forget saved contact info
//!
//! # Assistant (HTMX fragments)
//! GET  /assist                 - Assistant panel (?kind=&product_id=)
//! POST /assist/clear-cart      - Confirmed clear from the compare_cart shortcut
//! ```

pub mod assist;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod views;

use axum::{
    Router,
    response::AppendHeaders,
    routing::{get, post},
};
use serde_json::{Map, Value, json};

use crate::state::AppState;

/// Client event that refreshes the cart badge.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Client event that shows a toast; its detail carries `message`.
pub const TOAST_EVENT: &str = "show-toast";

/// Build an `HX-Trigger` header firing a toast and/or a cart refresh.
#[must_use]
pub fn hx_trigger(
    toast: Option<&str>,
    cart_updated: bool,
) -> AppendHeaders<[(&'static str, String); 1]> {
    let mut events = Map::new();
    if let Some(message) = toast {
        events.insert(TOAST_EVENT.to_string(), json!({ "message": message }));
    }
    if cart_updated {
        events.insert(CART_UPDATED_EVENT.to_string(), Value::Bool(true));
    }
    AppendHeaders([("HX-Trigger", Value::Object(events).to_string())])
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/forget", post(checkout::forget))
}

/// Create the assistant routes router.
pub fn assist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(assist::panel))
        .route("/clear-cart", post(assist::clear_cart))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/", get(catalog::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .nest("/checkout", checkout_routes())
        // Assistant
        .nest("/assist", assist_routes())
}
