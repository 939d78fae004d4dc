//! HTTP front door for the webhook relay.
//!
//! Routes subscription-management requests to the registry and inbound
//! notifications to the delivery engine. Every request passes the
//! shared-secret signature boundary before any registry or engine code
//! runs; by the time a handler executes, payloads are trusted.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

use std::sync::Arc;

pub use config::Config;
use relay_core::Registry;
use relay_delivery::DeliveryEngine;
pub use server::{create_router, start_server};

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Subscription registry over the single store instance.
    pub registry: Arc<Registry>,
    /// Delivery engine for notification fan-out.
    pub engine: Arc<DeliveryEngine>,
    /// Per-subscriber attempt budget, read once per notification batch.
    pub max_delivery_attempts: u32,
    /// Shared secret for the signature boundary; `None` disables it.
    pub shared_secret: Option<Arc<str>>,
}
