//! Checkout route handlers.
//!
//! The checkout page is a plain form post. A failed submission re-renders the
//! page with everything the customer typed, including the message, so they can
//! retry; a successful one redirects to the catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::error::Result;
use crate::routes::views::{CartView, LayoutView};
use crate::services::order::{EMPTY_CART_NOTICE, OrderError, OrderForm};
use crate::state::AppState;

/// Shown after saved contact details are removed.
pub const CONTACT_FORGOTTEN_NOTICE: &str = "Saved info cleared.";

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: LayoutView,
    pub cart: CartView,
    pub form: OrderForm,
    pub has_saved_contact: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl CheckoutTemplate {
    async fn load(state: &AppState, form: OrderForm) -> Self {
        let shop = state.shop();
        let cart = shop.cart().await;
        let error = cart.is_empty().then(|| EMPTY_CART_NOTICE.to_string());

        Self {
            layout: LayoutView::load(shop).await,
            cart: CartView::new(&cart, shop.catalog().config()),
            form,
            has_saved_contact: shop.saved_contact().await.is_some(),
            notice: None,
            error,
        }
    }
}

/// HTTP status for a rejected or failed order.
#[must_use]
pub const fn order_error_status(err: &OrderError) -> StatusCode {
    match err {
        OrderError::EmptyCart | OrderError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        OrderError::AlreadySending => StatusCode::CONFLICT,
        OrderError::Delivery(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Display the checkout form, pre-filled from saved contact details.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> CheckoutTemplate {
    let form = state.shop().checkout_form().await;
    CheckoutTemplate::load(&state, form).await
}

/// Submit the order.
#[instrument(skip(state, form))]
pub async fn submit(State(state): State<AppState>, Form(form): Form<OrderForm>) -> Response {
    match state.shop().submit_order(&form).await {
        Ok(()) => Redirect::to("/?notice=order_placed").into_response(),
        Err(err) => {
            if matches!(err, OrderError::Delivery(_)) {
                let event_id = sentry::capture_error(&err);
                tracing::error!(
                    error = %err,
                    sentry_event_id = %event_id,
                    "Order submission failed"
                );
            } else {
                tracing::info!(error = %err, "Order rejected");
            }

            let mut page = CheckoutTemplate::load(&state, form).await;
            page.error = Some(err.user_message());
            (order_error_status(&err), page).into_response()
        }
    }
}

/// Forget saved contact details and show a blank form.
#[instrument(skip(state))]
pub async fn forget(State(state): State<AppState>) -> Result<CheckoutTemplate> {
    state.shop().forget_contact_info().await?;

    let mut page = CheckoutTemplate::load(&state, OrderForm::default()).await;
    page.notice = Some(CONTACT_FORGOTTEN_NOTICE.to_string());
    Ok(page)
}
