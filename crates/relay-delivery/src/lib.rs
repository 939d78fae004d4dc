//! Webhook delivery engine.
//!
//! Fans each inbound event out to every subscriber registered for its
//! (bucket, rule) pair, retrying failed deliveries with exponential
//! backoff and unsubscribing targets that exhaust their retry budget.
//!
//! Events in a batch are processed sequentially; subscribers within an
//! event are dispatched concurrently, and the engine waits for the
//! whole fan-out to settle before moving on. Delivery failures never
//! propagate past the engine — the triggering request has already been
//! acknowledged, so they are absorbed into the unsubscribe side effect
//! and structured logging.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod engine;
pub mod error;
pub mod retry;

pub use client::{ClientConfig, DeliveryClient};
pub use engine::{DeliveryEngine, EngineConfig};
pub use error::{DeliveryError, Result};
pub use retry::RetryPolicy;

/// Default maximum delivery attempts per subscriber/event pair.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default HTTP request timeout in seconds for one delivery attempt.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
