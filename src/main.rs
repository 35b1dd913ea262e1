//! Placement Eligibility Predictor
//!
//! Single-page form that runs student metrics through a pre-trained
//! classifier bundle and shows a placement-eligibility verdict.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 PLACEMENT PREDICTOR                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  Page     │  │  JSON API │  │  Health / Model info    │ │
//! │  │  (Axum)   │  │  (Axum)   │  │                         │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │   profile → feature vector → scaler → classifier → verdict  │
//! │                       ▲                                     │
//! │                ┌──────┴──────┐                              │
//! │                │ BundleCache │  (loaded once, main.json)    │
//! │                └─────────────┘                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod assets;
mod config;
mod engine;
mod error;
mod features;
mod handlers;
mod models;
mod views;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::assets::Background;
use crate::config::{Config, LogFormat};
use crate::engine::{BundleCache, InferenceStats};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Placement Eligibility Predictor starting...");
    tracing::info!("Model bundle: {} (loaded on first request)", config.bundle_path.display());

    // Build application state
    let state = AppState::new(config.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = config.socket_addr();
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let default_filter = if config.is_production() {
        "placement_predictor=info,tower_http=info"
    } else {
        "placement_predictor=debug,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub bundles: Arc<BundleCache>,
    pub stats: Arc<InferenceStats>,
    pub background: Option<Arc<Background>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let background = Background::load(&config.background_path).map(Arc::new);

        Self {
            bundles: Arc::new(BundleCache::new(config.bundle_path.clone())),
            stats: Arc::new(InferenceStats::default()),
            background,
            config,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // The page
    let page_routes = Router::new()
        .route("/", get(handlers::page::show).post(handlers::page::submit));

    // JSON mirror of the page
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/model", get(handlers::model::info))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        );

    // Combine all routes
    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
