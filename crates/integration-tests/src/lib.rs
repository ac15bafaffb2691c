//! Integration tests for Telecart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p telecart-integration-tests
//! ```
//!
//! No external services are needed: Telegram is a `wiremock` server and the
//! persistent store lives in a temporary directory.
//!
//! # Test Categories
//!
//! - `order_flow` - Checkout through the shop controller
//! - `storefront_routes` - HTTP surface via `tower::ServiceExt::oneshot`

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use tempfile::TempDir;
use telecart_storefront::catalog::{Catalog, CatalogSource};
use telecart_storefront::config::StorefrontConfig;
use telecart_storefront::store::{FileStore, PersistentStore};
use telecart_storefront::telegram::TelegramClient;
use telecart_storefront::{AppState, Shop};
use tower::ServiceExt;
use url::Url;
use wiremock::MockServer;

/// Bot token used by [`CONFIG_JSON`].
pub const BOT_TOKEN: &str = "4242:test-token";

/// Path the storefront posts orders to on the mock server.
pub const SEND_MESSAGE_PATH: &str = "/bot4242:test-token/sendMessage";

/// Store configuration for the test shop.
pub const CONFIG_JSON: &str = r#"{
    "business_name": "Corner Coffee",
    "currency_symbol": "$",
    "escalation_message": "Talk to us",
    "supported_contact_types": ["phone", "telegram"],
    "contact": {"phone": "+15550100", "telegram": "cornercoffee"},
    "ai_responses": {
        "explain_product_default": "A customer favourite.",
        "help_me_choose": ["Try the Latte."]
    },
    "telegram_bot_token": "4242:test-token",
    "telegram_chat_id": -100200
}"#;

/// Product list for the test shop.
pub const PRODUCTS_JSON: &str = r#"[
    {"id": 1, "name": "Latte", "description": "Espresso and milk", "price": 10.00,
     "custom_explanation": "Two shots, steamed milk."},
    {"id": 2, "name": "Scone", "description": "Baked daily", "price": 5.50, "info": ["bakery"]}
]"#;

/// A shop wired to a mock Telegram server and a temporary data directory.
pub struct TestContext {
    pub telegram: MockServer,
    pub data_dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    /// Start a fresh shop with an empty store.
    pub async fn new() -> Self {
        let telegram = MockServer::start().await;
        let data_dir = tempfile::tempdir().unwrap();
        let state = build_state(&telegram, data_dir.path());
        Self {
            telegram,
            data_dir,
            state,
        }
    }

    /// Simulate a restart: a new shop over the same data directory.
    #[must_use]
    pub fn restart(&self) -> AppState {
        build_state(&self.telegram, self.data_dir.path())
    }

    /// The shop controller.
    #[must_use]
    pub fn shop(&self) -> &Shop {
        self.state.shop()
    }

    /// Direct access to what is on disk.
    #[must_use]
    pub fn store(&self) -> PersistentStore {
        PersistentStore::new(FileStore::open(self.data_dir.path()).unwrap())
    }

    /// The full storefront router.
    #[must_use]
    pub fn router(&self) -> Router {
        telecart_storefront::app(self.state.clone(), Path::new("static"))
    }

    /// Send one request through the router.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router().oneshot(request).await.unwrap()
    }
}

fn build_state(telegram: &MockServer, data_dir: &Path) -> AppState {
    let config = StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        catalog: CatalogSource::Directory(data_dir.to_path_buf()),
        data_dir: data_dir.to_path_buf(),
        telegram_api_base: Url::parse(&telegram.uri()).unwrap(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };

    let catalog = Catalog::from_documents(CONFIG_JSON, PRODUCTS_JSON).unwrap();
    let client = TelegramClient::new(
        reqwest::Client::new(),
        &config.telegram_api_base,
        &catalog.config().telegram,
    );
    let store = PersistentStore::new(FileStore::open(data_dir).unwrap());
    let shop = Shop::new(catalog, store, client);
    AppState::new(config, shop)
}

/// A GET request.
#[must_use]
pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

/// A form-encoded POST request.
#[must_use]
pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The `HX-Trigger` header of a response, parsed.
#[must_use]
pub fn hx_trigger(response: &Response) -> serde_json::Value {
    response
        .headers()
        .get("HX-Trigger")
        .and_then(|value| value.to_str().ok())
        .map_or(serde_json::Value::Null, |raw| {
            serde_json::from_str(raw).unwrap()
        })
}
