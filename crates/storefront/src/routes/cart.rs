//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation is persisted by the shop before the fragment is rendered.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use telecart_core::ProductId;
use tracing::instrument;

use crate::error::Result;
use crate::routes::hx_trigger;
use crate::routes::views::{CartView, LayoutView};
use crate::services::assist::CART_CLEARED_NOTICE;
use crate::state::AppState;

/// Shown after a product is added.
pub const ADDED_TO_CART_NOTICE: &str = "Added to cart!";

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    pub delta: i64,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: LayoutView,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

async fn cart_items(state: &AppState) -> CartItemsTemplate {
    let shop = state.shop();
    CartItemsTemplate {
        cart: CartView::new(&shop.cart().await, shop.catalog().config()),
    }
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CartShowTemplate {
    let shop = state.shop();
    CartShowTemplate {
        layout: LayoutView::load(shop).await,
        cart: CartView::new(&shop.cart().await, shop.catalog().config()),
    }
}

/// Add one unit of a product (HTMX).
///
/// Returns the updated count badge and a confirmation toast. An unknown
/// product is a 404 with an error toast; the cart is left alone.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    state.shop().add_item(form.product_id).await?;
    let count = state.shop().cart_count().await;

    Ok((
        hx_trigger(Some(ADDED_TO_CART_NOTICE), true),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Adjust a line's quantity (HTMX).
///
/// A product that is not in the cart is ignored and the current items are
/// returned unchanged.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let changed = state
        .shop()
        .adjust_quantity(form.product_id, form.delta)
        .await?
        .is_some();

    let items = cart_items(&state).await;
    Ok((hx_trigger(None, changed), items).into_response())
}

/// Clear the cart (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Result<Response> {
    state.shop().clear_cart().await?;

    let items = cart_items(&state).await;
    Ok((hx_trigger(Some(CART_CLEARED_NOTICE), true), items).into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> CartCountTemplate {
    CartCountTemplate {
        count: state.shop().cart_count().await,
    }
}
