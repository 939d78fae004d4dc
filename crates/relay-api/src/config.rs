//! Configuration loading for the relay service.
//!
//! Sources merge in priority order: environment variables override
//! `config.toml`, which overrides built-in defaults. The service runs
//! out of the box with no file present.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use relay_delivery::{ClientConfig, EngineConfig, RetryPolicy};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address. Env: `HOST`.
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,

    /// Server bind port. Env: `PORT`.
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,

    /// Inbound HTTP request timeout in seconds. Env: `REQUEST_TIMEOUT`.
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    /// Attempt budget per subscriber and event. Env: `MAX_DELIVERY_ATTEMPTS`.
    #[serde(default = "default_max_attempts", alias = "MAX_DELIVERY_ATTEMPTS")]
    pub max_delivery_attempts: u32,

    /// Backoff base delay in milliseconds. Env: `RETRY_BASE_DELAY_MS`.
    #[serde(default = "default_base_delay_ms", alias = "RETRY_BASE_DELAY_MS")]
    pub retry_base_delay_ms: u64,

    /// Timeout for one outbound delivery attempt in seconds.
    /// Env: `DELIVERY_TIMEOUT_SECONDS`.
    #[serde(default = "default_delivery_timeout", alias = "DELIVERY_TIMEOUT_SECONDS")]
    pub delivery_timeout_seconds: u64,

    /// Shared secret for inbound signature verification. Empty disables
    /// the boundary (development only). Env: `SHARED_SECRET`.
    #[serde(default, alias = "SHARED_SECRET")]
    pub shared_secret: String,

    /// Log filter directive. Env: `RUST_LOG`.
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Loads and validates configuration from all sources.
    pub fn load() -> Result<Self> {
        let merged = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = merged.extract().context("failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Converts to the delivery crate's engine configuration.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            client_config: ClientConfig {
                timeout: Duration::from_secs(self.delivery_timeout_seconds),
                user_agent: "Relay-Webhook-Delivery/1.0".to_string(),
            },
            retry_policy: RetryPolicy {
                max_attempts: self.max_delivery_attempts,
                base_delay: Duration::from_millis(self.retry_base_delay_ms),
            },
        }
    }

    /// Combines host and port into the server bind address.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        SocketAddr::from_str(&format!("{}:{}", self.host, self.port))
            .context("invalid server address")
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.port > 0, "port must be greater than 0");
        anyhow::ensure!(
            self.max_delivery_attempts > 0,
            "max_delivery_attempts must be greater than 0"
        );
        anyhow::ensure!(self.request_timeout > 0, "request_timeout must be greater than 0");
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            max_delivery_attempts: default_max_attempts(),
            retry_base_delay_ms: default_base_delay_ms(),
            delivery_timeout_seconds: default_delivery_timeout(),
            shared_secret: String::new(),
            rust_log: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_delivery_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".into()
}
