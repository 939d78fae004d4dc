//! Notification fan-out with retry and failure-triggered unsubscription.
//!
//! The engine processes one batch of events at a time: for each event
//! it looks up the subscribers of the event's (bucket, rule) pair,
//! starts every delivery concurrently, waits for all of them to settle,
//! then unsubscribes any target that exhausted its retry budget. The
//! next event does not start until the previous fan-out and pruning
//! have fully settled.

use std::sync::Arc;

use futures::future::join_all;
use relay_core::{CoreError, Event, Registry, Subscription, SubscriptionId};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::{
    client::{ClientConfig, DeliveryClient},
    error::{DeliveryError, Result},
    retry::RetryPolicy,
};

/// Configuration for the delivery engine.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// HTTP client configuration.
    pub client_config: ClientConfig,
    /// Retry policy applied when a batch carries no override.
    pub retry_policy: RetryPolicy,
}

/// Delivery engine coordinating webhook fan-out for event batches.
pub struct DeliveryEngine {
    registry: Arc<Registry>,
    client: DeliveryClient,
    policy: RetryPolicy,
}

impl DeliveryEngine {
    /// Creates a delivery engine reading subscriptions from `registry`.
    pub fn new(registry: Arc<Registry>, config: EngineConfig) -> Result<Self> {
        let client = DeliveryClient::new(config.client_config)?;
        Ok(Self { registry, client, policy: config.retry_policy })
    }

    /// Processes one ordered batch of events.
    ///
    /// `max_attempts` is the per-subscriber attempt budget for this
    /// batch. Never returns an error: the triggering request has
    /// already been acknowledged, so a registry failure that is not
    /// not-found aborts the remaining batch and is logged instead.
    pub async fn process_batch(&self, events: Vec<Event>, max_attempts: u32) {
        let policy = RetryPolicy { max_attempts, ..self.policy.clone() };

        for event in &events {
            if let Err(e) = self.process_event(event, &policy).await {
                error!(
                    bucket = %event.bucket_name,
                    rule = %event.matched_rule_name,
                    error = %e,
                    "subscriber lookup failed, aborting remaining batch"
                );
                return;
            }
        }
    }

    /// Fans one event out to every current subscriber of its rule.
    ///
    /// Not-found during lookup means no subscribers and is a no-op; any
    /// other registry error propagates to the batch loop.
    async fn process_event(
        &self,
        event: &Event,
        policy: &RetryPolicy,
    ) -> std::result::Result<(), CoreError> {
        let bucket = event.bucket_name.as_str();
        let rule = event.matched_rule_name.as_str();

        let subscribers = match self.registry.rule(bucket, rule).await {
            Ok(subscribers) => subscribers,
            Err(e) if e.is_not_found() => {
                debug!(bucket, rule, "no subscribers registered, skipping event");
                return Ok(());
            },
            Err(e) => return Err(e),
        };

        let deliveries = subscribers.iter().map(|(id, subscription)| async move {
            let result = self.deliver_with_retry(event, *id, subscription, policy).await;
            (*id, result)
        });

        let settled = join_all(deliveries).await;

        for (id, result) in settled {
            if result.is_ok() {
                continue;
            }
            // The subscription may already be gone if a racing delivery
            // for another event pruned it first.
            match self.registry.delete(bucket, rule, id).await {
                Ok(removed) => {
                    warn!(
                        bucket,
                        rule,
                        subscription_id = %id,
                        url = %removed.url,
                        "subscriber exhausted retries and was unsubscribed"
                    );
                },
                Err(e) => {
                    warn!(
                        bucket,
                        rule,
                        subscription_id = %id,
                        error = %e,
                        "failed to unsubscribe exhausted subscriber"
                    );
                },
            }
        }

        Ok(())
    }

    /// Delivers one event to one subscriber, retrying with backoff.
    ///
    /// Success is a 2xx response. Each attempt's outcome is logged;
    /// callers only see the final result.
    async fn deliver_with_retry(
        &self,
        event: &Event,
        id: SubscriptionId,
        subscription: &Subscription,
        policy: &RetryPolicy,
    ) -> Result<()> {
        for attempt in 1..=policy.max_attempts {
            let delay = policy.delay_before(attempt);
            if !delay.is_zero() {
                sleep(delay).await;
            }

            let failure = match self.client.deliver(&subscription.url, event).await {
                Ok(response) if response.is_success => {
                    info!(
                        subscription_id = %id,
                        url = %subscription.url,
                        status = response.status_code,
                        attempt,
                        "event delivered"
                    );
                    return Ok(());
                },
                Ok(response) => DeliveryError::unexpected_status(response.status_code),
                Err(e) => e,
            };

            warn!(
                subscription_id = %id,
                url = %subscription.url,
                error = %failure,
                attempt,
                max_attempts = policy.max_attempts,
                "delivery attempt failed"
            );
        }

        Err(DeliveryError::retries_exhausted(policy.max_attempts))
    }
}
