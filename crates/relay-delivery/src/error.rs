//! Error types for webhook delivery attempts.
//!
//! Every variant except `RetriesExhausted` describes a single failed
//! attempt; all of them are retried until the attempt budget runs out,
//! since a non-2xx response and a network failure are treated alike by
//! the backoff policy.

use thiserror::Error;

/// Result type alias for delivery operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Error conditions for one delivery attempt or an exhausted sequence.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// Network-level connectivity failure.
    #[error("network connection failed: {message}")]
    Network {
        /// Description of the network failure.
        message: String,
    },

    /// HTTP request timeout exceeded.
    #[error("request timeout after {timeout_seconds}s")]
    Timeout {
        /// Configured per-attempt timeout in seconds.
        timeout_seconds: u64,
    },

    /// HTTP response carried a non-success status.
    #[error("unexpected status: HTTP {status_code}")]
    UnexpectedStatus {
        /// Status code returned by the subscriber.
        status_code: u16,
    },

    /// All delivery attempts exhausted; the subscriber will be removed.
    #[error("delivery failed after {attempts} attempts")]
    RetriesExhausted {
        /// Total attempts made before giving up.
        attempts: u32,
    },

    /// Invalid client or request configuration.
    #[error("invalid delivery configuration: {message}")]
    Configuration {
        /// Configuration error message.
        message: String,
    },
}

impl DeliveryError {
    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Creates an unexpected-status error from an HTTP response code.
    pub fn unexpected_status(status_code: u16) -> Self {
        Self::UnexpectedStatus { status_code }
    }

    /// Creates a retries-exhausted error.
    pub fn retries_exhausted(attempts: u32) -> Self {
        Self::RetriesExhausted { attempts }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}
