//! Assistant panel route handlers (HTMX fragments).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use telecart_core::ProductId;
use tracing::instrument;

use crate::error::Result;
use crate::routes::hx_trigger;
use crate::services::assist::{
    AssistKind, AssistOutcome, AssistPanel, CART_ALREADY_EMPTY_NOTICE, CART_CLEARED_NOTICE,
    CLEAR_CART_PROMPT,
};
use crate::state::AppState;

/// Assistant query parameters.
#[derive(Debug, Deserialize)]
pub struct AssistQuery {
    pub kind: AssistKind,
    pub product_id: Option<ProductId>,
}

/// Assistant text with escalation buttons.
#[derive(Template, WebTemplate)]
#[template(path = "partials/assist_panel.html")]
pub struct AssistPanelTemplate {
    pub panel: AssistPanel,
}

/// Confirmation prompt for the clear-cart shortcut.
#[derive(Template, WebTemplate)]
#[template(path = "partials/confirm_clear.html")]
pub struct ConfirmClearTemplate {
    pub prompt: &'static str,
}

/// Open the assistant panel.
#[instrument(skip(state))]
pub async fn panel(
    State(state): State<AppState>,
    Query(query): Query<AssistQuery>,
) -> Result<Response> {
    let outcome = state.shop().assist(query.kind, query.product_id).await?;

    Ok(match outcome {
        AssistOutcome::Panel(panel) => AssistPanelTemplate { panel }.into_response(),
        AssistOutcome::ConfirmClearCart => ConfirmClearTemplate {
            prompt: CLEAR_CART_PROMPT,
        }
        .into_response(),
        AssistOutcome::CartAlreadyEmpty => {
            (hx_trigger(Some(CART_ALREADY_EMPTY_NOTICE), false), Html("")).into_response()
        }
    })
}

/// Clear the cart after the customer confirmed the prompt.
///
/// The panel is closed by swapping in an empty body.
#[instrument(skip(state))]
pub async fn clear_cart(State(state): State<AppState>) -> Result<Response> {
    let notice = if state.shop().confirm_clear_cart().await? {
        CART_CLEARED_NOTICE
    } else {
        CART_ALREADY_EMPTY_NOTICE
    };
    Ok((hx_trigger(Some(notice), true), Html("")).into_response())
}
