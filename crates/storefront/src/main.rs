//! Telecart Storefront - single-shop storefront that relays orders to Telegram.
//!
//! This binary serves the storefront on port 3000 by default.
//!
//! # Architecture
//!
//! - Axum web framework with HTMX for interactivity
//! - Askama templates for server-side rendering
//! - Catalog (`config.json` + `products.json`) loaded once at startup
//! - Cart and contact details persisted as JSON files in the data directory
//! - Orders delivered as a single Telegram Bot API message
//!
//! Startup fails if the catalog cannot be loaded; no partial catalog is served.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::process::ExitCode;

use sentry::integrations::tracing as sentry_tracing;
use telecart_storefront::catalog::Catalog;
use telecart_storefront::config::StorefrontConfig;
use telecart_storefront::store::{FileStore, PersistentStore};
use telecart_storefront::telegram::TelegramClient;
use telecart_storefront::{AppState, Shop};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Static assets, relative to the workspace root.
const STATIC_DIR: &str = "crates/storefront/static";

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Report a failure that happens before logging is set up.
#[allow(clippy::print_stderr)]
fn report_startup_error(context: &str, err: &dyn std::fmt::Display) {
    eprintln!("{context}: {err}");
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load configuration from environment (needed for Sentry init)
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            report_startup_error("Failed to load configuration", &e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "telecart_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let http = reqwest::Client::new();

    let catalog = match Catalog::load(&config.catalog, &http).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, source = ?config.catalog, "Failed to load catalog");
            return ExitCode::FAILURE;
        }
    };

    let backend = match FileStore::open(&config.data_dir) {
        Ok(backend) => backend,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open data directory");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(dir = %backend.dir().display(), "Persistent store opened");

    let telegram = TelegramClient::new(
        http,
        &config.telegram_api_base,
        &catalog.config().telegram,
    );
    let shop = Shop::new(catalog, PersistentStore::new(backend), telegram);
    let state = AppState::new(config.clone(), shop);

    let app = telecart_storefront::app(state, Path::new(STATIC_DIR))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    // Start server
    let addr = config.socket_addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind to address");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("storefront listening on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
