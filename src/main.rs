//! Webhook relay service.
//!
//! Wires the store, registry, delivery engine, and HTTP server
//! together and coordinates startup and graceful shutdown.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use relay_api::{AppState, Config};
use relay_core::{MemoryStore, Registry};
use relay_delivery::DeliveryEngine;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("starting webhook relay service");

    let config = Config::load()?;
    let addr = config.parse_server_addr()?;
    info!(
        addr = %addr,
        max_delivery_attempts = config.max_delivery_attempts,
        "configuration loaded"
    );

    let store = Arc::new(MemoryStore::new());
    let registry = Arc::new(Registry::new(store));
    let engine = Arc::new(
        DeliveryEngine::new(Arc::clone(&registry), config.to_engine_config())
            .context("failed to build delivery engine")?,
    );

    let shared_secret = if config.shared_secret.is_empty() {
        None
    } else {
        Some(Arc::from(config.shared_secret.as_str()))
    };

    let state = AppState {
        registry,
        engine,
        max_delivery_attempts: config.max_delivery_attempts,
        shared_secret,
    };

    relay_api::start_server(state, addr, Duration::from_secs(config.request_timeout))
        .await
        .context("server failed")?;

    info!("relay shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,relay=debug,tower_http=debug"))
        .expect("invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
