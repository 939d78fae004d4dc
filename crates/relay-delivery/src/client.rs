//! HTTP client for webhook delivery with per-attempt timeouts.
//!
//! Handles request construction, response categorization, and the
//! forwarded notification wire shape (`{"event": [<event>]}`).

use std::time::Duration;

use chrono::{DateTime, Utc};
use relay_core::Event;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{DeliveryError, Result},
    DEFAULT_TIMEOUT_SECONDS,
};

/// Configuration for the delivery client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Timeout for one delivery attempt.
    pub timeout: Duration,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            user_agent: "Relay-Webhook-Delivery/1.0".to_string(),
        }
    }
}

/// JSON body forwarded to a subscriber: one event wrapped in an array.
#[derive(Debug, Serialize)]
pub struct ForwardedNotification<'a> {
    /// The single event being delivered.
    pub event: [&'a Event; 1],
}

/// Outcome of one delivery attempt, observable for diagnostics.
#[derive(Debug, Clone)]
pub struct DeliveryResponse {
    /// HTTP status code returned by the subscriber.
    pub status_code: u16,
    /// Whether the status indicates success (2xx).
    pub is_success: bool,
    /// Total duration of the request.
    pub duration: Duration,
    /// When the attempt was made.
    pub attempted_at: DateTime<Utc>,
}

/// HTTP client optimized for webhook fan-out.
///
/// Uses connection pooling so concurrent deliveries to the same host
/// reuse connections. A response of any status is an `Ok` — the retry
/// layer decides what counts as failure.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl DeliveryClient {
    /// Creates a new delivery client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `DeliveryError::Configuration` if the HTTP client cannot
    /// be built with the provided settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                DeliveryError::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// Creates a delivery client with default configuration.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// POSTs one event to a subscriber URL.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` when the per-attempt timeout elapses and
    /// `Network` for connection-level failures. HTTP responses of any
    /// status are returned as `Ok(DeliveryResponse)`.
    pub async fn deliver(&self, url: &str, event: &Event) -> Result<DeliveryResponse> {
        let attempted_at = Utc::now();
        let start = std::time::Instant::now();

        let body = ForwardedNotification { event: [event] };

        let response = self.client.post(url).json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                DeliveryError::timeout(self.config.timeout.as_secs())
            } else if e.is_connect() {
                DeliveryError::network(format!("connection failed: {e}"))
            } else {
                DeliveryError::network(e.to_string())
            }
        })?;

        let duration = start.elapsed();
        let status_code = response.status().as_u16();
        let is_success = response.status().is_success();

        debug!(url, status = status_code, duration_ms = duration.as_millis(), "attempt finished");

        Ok(DeliveryResponse { status_code, is_success, duration, attempted_at })
    }
}
