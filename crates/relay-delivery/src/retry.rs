//! Exponential backoff policy for failed deliveries.
//!
//! An attempt succeeds when the HTTP response status is 2xx. The first
//! two attempts fire immediately; thereafter the inter-attempt delay
//! doubles starting from the base delay, so with the default 1s base
//! the delay sequence is `0, 1000, 2000, 4000, …` milliseconds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::DEFAULT_MAX_ATTEMPTS;

/// Retry policy for webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of delivery attempts, including the initial one.
    pub max_attempts: u32,

    /// Delay before the third attempt; doubles for each attempt after.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, base_delay: Duration::from_millis(1000) }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and default base delay.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts, ..Self::default() }
    }

    /// Returns the delay inserted before the given 1-based attempt.
    ///
    /// Attempts 1 and 2 fire immediately; attempt 3 waits the base
    /// delay, and every attempt after that doubles it. The exponent is
    /// clamped so large attempt numbers cannot overflow.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        match attempt {
            0..=2 => Duration::ZERO,
            n => {
                let exponent = (n - 3).min(20);
                self.base_delay * 2_u32.saturating_pow(exponent)
            },
        }
    }
}
