//! Integration tests for the storefront HTTP surface.
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use telecart_core::ProductId;
use telecart_integration_tests::{
    SEND_MESSAGE_PATH, TestContext, body_text, get, hx_trigger, post_form,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const CHECKOUT_FORM: &str = "name=Ada&phone=555-0100&email=&social=&message=Oat+milk";

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let response = ctx.request(get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_catalog_lists_products() {
    let ctx = TestContext::new().await;
    let response = ctx.request(get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("Corner Coffee"));
    assert!(html.contains("Latte"));
    assert!(html.contains("$10.00"));
    assert!(html.contains("Scone"));
    assert!(html.contains("$5.50"));
    assert!(html.contains("bakery"));
}

#[tokio::test]
async fn test_catalog_shows_order_placed_notice() {
    let ctx = TestContext::new().await;
    let html = body_text(ctx.request(get("/?notice=order_placed")).await).await;
    assert!(html.contains("Order placed successfully!"));
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_add_to_cart_returns_count_and_toast() {
    let ctx = TestContext::new().await;

    let response = ctx.request(post_form("/cart/add", "product_id=1")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let trigger = hx_trigger(&response);
    assert_eq!(trigger["show-toast"]["message"], "Added to cart!");
    assert_eq!(trigger["cart-updated"], true);
    assert_eq!(body_text(response).await.trim(), "1");

    let response = ctx.request(post_form("/cart/add", "product_id=1")).await;
    assert_eq!(body_text(response).await.trim(), "2");

    assert_eq!(ctx.store().load_cart().count(), 2);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;

    let response = ctx.request(post_form("/cart/add", "product_id=99")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(hx_trigger(&response)["show-toast"]["message"].is_string());

    assert!(ctx.shop().cart().await.is_empty());
    assert!(ctx.store().load_cart().is_empty());
}

#[tokio::test]
async fn test_update_and_remove_line() {
    let ctx = TestContext::new().await;
    ctx.shop().add_item(ProductId::new(2)).await.unwrap();

    let response = ctx
        .request(post_form("/cart/update", "product_id=2&delta=1"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Scone"));
    assert!(html.contains("$11.00"));

    let response = ctx
        .request(post_form("/cart/update", "product_id=2&delta=-2"))
        .await;
    let html = body_text(response).await;
    assert!(html.contains("Your cart is empty."));
    assert!(ctx.store().load_cart().is_empty());

    // The removed line does not come back through update.
    let response = ctx
        .request(post_form("/cart/update", "product_id=2&delta=1"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(ctx.shop().cart().await.is_empty());
}

#[tokio::test]
async fn test_clear_cart() {
    let ctx = TestContext::new().await;
    ctx.shop().add_item(ProductId::new(1)).await.unwrap();

    let response = ctx.request(post_form("/cart/clear", "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hx_trigger(&response)["show-toast"]["message"], "Cart cleared!");
    assert!(ctx.store().load_cart().is_empty());
}

#[tokio::test]
async fn test_cart_page_and_count() {
    let ctx = TestContext::new().await;
    ctx.shop().add_item(ProductId::new(1)).await.unwrap();
    ctx.shop().add_item(ProductId::new(2)).await.unwrap();

    let html = body_text(ctx.request(get("/cart")).await).await;
    assert!(html.contains("Latte"));
    assert!(html.contains("Total: $15.50"));

    let count = body_text(ctx.request(get("/cart/count")).await).await;
    assert_eq!(count.trim(), "2");
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_button_locks_while_sending() {
    let ctx = TestContext::new().await;
    ctx.shop().add_item(ProductId::new(1)).await.unwrap();

    let html = body_text(ctx.request(get("/checkout")).await).await;
    assert!(html.contains("data-submit-once"));
    assert!(html.contains("data-sending-label=\"Sending...\""));
    assert!(html.contains("Place order"));
}

#[tokio::test]
async fn test_checkout_success_redirects_to_catalog() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path(SEND_MESSAGE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.telegram)
        .await;
    ctx.shop().add_item(ProductId::new(1)).await.unwrap();

    let response = ctx.request(post_form("/checkout", CHECKOUT_FORM)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/?notice=order_placed"
    );
    assert!(ctx.store().load_cart().is_empty());
}

#[tokio::test]
async fn test_checkout_failure_keeps_form() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&ctx.telegram)
        .await;
    ctx.shop().add_item(ProductId::new(1)).await.unwrap();

    let response = ctx.request(post_form("/checkout", CHECKOUT_FORM)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let html = body_text(response).await;
    assert!(html.contains("Error sending order. Please contact us directly."));
    assert!(html.contains("Oat milk"));
    assert_eq!(ctx.store().load_cart().count(), 1);
}

#[tokio::test]
async fn test_checkout_with_empty_cart_is_rejected() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.telegram)
        .await;

    let response = ctx.request(post_form("/checkout", CHECKOUT_FORM)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Your cart is empty!"));
}

#[tokio::test]
async fn test_checkout_prefills_and_forgets_contact() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.telegram)
        .await;
    ctx.shop().add_item(ProductId::new(1)).await.unwrap();
    let _ = ctx.request(post_form("/checkout", CHECKOUT_FORM)).await;

    let html = body_text(ctx.request(get("/checkout")).await).await;
    assert!(html.contains("value=\"Ada\""));
    assert!(html.contains("value=\"555-0100\""));
    // The message is never pre-filled.
    assert!(!html.contains("Oat milk"));

    let response = ctx.request(post_form("/checkout/forget", "")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Saved info cleared."));
    assert!(!html.contains("value=\"Ada\""));
    assert!(ctx.store().load_contact_info().is_none());
}

// =============================================================================
// Assistant
// =============================================================================

#[tokio::test]
async fn test_assist_explain_product() {
    let ctx = TestContext::new().await;

    let html = body_text(ctx.request(get("/assist?kind=explain&product_id=1")).await).await;
    assert!(html.contains("Two shots, steamed milk."));
    assert!(html.contains("Talk to us"));
    assert!(html.contains("tel:+15550100"));
    assert!(html.contains("https://t.me/cornercoffee"));

    let html = body_text(ctx.request(get("/assist?kind=explain&product_id=2")).await).await;
    assert!(html.contains("A customer favourite."));

    let response = ctx.request(get("/assist?kind=explain&product_id=9")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assist_help_me_choose() {
    let ctx = TestContext::new().await;
    let html = body_text(ctx.request(get("/assist?kind=help_me_choose")).await).await;
    assert!(html.contains("Try the Latte."));
}

#[tokio::test]
async fn test_compare_cart_confirms_before_clearing() {
    let ctx = TestContext::new().await;

    let response = ctx.request(get("/assist?kind=compare_cart")).await;
    assert_eq!(
        hx_trigger(&response)["show-toast"]["message"],
        "Cart is already empty!"
    );

    ctx.shop().add_item(ProductId::new(1)).await.unwrap();
    let html = body_text(ctx.request(get("/assist?kind=compare_cart")).await).await;
    assert!(html.contains("Are you sure you want to clear the entire cart?"));
    assert_eq!(ctx.shop().cart_count().await, 1);

    let response = ctx.request(post_form("/assist/clear-cart", "")).await;
    assert_eq!(hx_trigger(&response)["show-toast"]["message"], "Cart cleared!");
    assert!(ctx.store().load_cart().is_empty());
}
