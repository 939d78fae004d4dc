//! Subscription registry: CRUD over the bucket → rule → subscription
//! hierarchy.
//!
//! The registry exclusively owns creation, mutation, and deletion of
//! bucket records. Every mutation is a read-modify-write of the whole
//! record, serialized through a single async mutex so concurrent
//! mutations of the same bucket never interleave. Reads take no lock
//! and reflect store state at the time of the read.
//!
//! Emptiness invariants: a rule is never persisted empty, and a bucket
//! record that loses its last rule is deleted from the store rather
//! than persisted as an empty map.

use std::{collections::BTreeMap, str::FromStr, sync::Arc};

use tracing::debug;
use url::Url;

use crate::{
    error::{CoreError, Result},
    models::{BucketRecord, Rule, Subscription, SubscriptionId},
    store::Store,
};

/// Registry over a single store instance.
pub struct Registry {
    store: Arc<dyn Store>,
    // Serializes read-modify-write sequences; reads bypass it.
    write_lock: tokio::sync::Mutex<()>,
}

impl Registry {
    /// Creates a registry backed by the given store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store, write_lock: tokio::sync::Mutex::new(()) }
    }

    /// Registers a new subscription and returns its generated ID.
    ///
    /// Creates the bucket record and rule entry if absent. Fails with
    /// `InvalidInput` when `url` is empty or not an absolute URL.
    pub async fn create(&self, bucket: &str, rule: &str, url: &str) -> Result<SubscriptionId> {
        validate_url(url)?;

        let id = SubscriptionId::new();
        let _guard = self.write_lock.lock().await;

        let mut record = self.store.get(bucket).await?.unwrap_or_default();
        record
            .entry(rule.to_string())
            .or_default()
            .insert(id, Subscription { url: url.to_string() });
        self.store.put(bucket, record).await?;

        debug!(bucket, rule, subscription_id = %id, "subscription created");
        Ok(id)
    }

    /// Returns every bucket record keyed by bucket name.
    pub async fn all(&self) -> Result<BTreeMap<String, BucketRecord>> {
        self.store.list().await
    }

    /// Returns one bucket's rule map.
    pub async fn bucket(&self, bucket: &str) -> Result<BucketRecord> {
        self.store
            .get(bucket)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("bucket {bucket}")))
    }

    /// Returns one rule's subscription map.
    pub async fn rule(&self, bucket: &str, rule: &str) -> Result<Rule> {
        let record = self.bucket(bucket).await?;
        record
            .get(rule)
            .cloned()
            .ok_or_else(|| CoreError::not_found(format!("rule {rule} in bucket {bucket}")))
    }

    /// Returns a single subscription.
    pub async fn subscription(
        &self,
        bucket: &str,
        rule: &str,
        id: SubscriptionId,
    ) -> Result<Subscription> {
        let subscriptions = self.rule(bucket, rule).await?;
        subscriptions
            .get(&id)
            .cloned()
            .ok_or_else(|| CoreError::not_found(format!("subscription {id} in {bucket}/{rule}")))
    }

    /// Bulk-overwrites a rule's subscription map.
    ///
    /// Every supplied key must parse as a UUID and every subscription
    /// must carry a non-empty url; on rejection the prior state is left
    /// unmodified. The bucket must already have a record — this
    /// operation does not create buckets. Replacing with an empty map
    /// removes the rule entirely, cascading to bucket deletion if it
    /// was the last rule.
    pub async fn replace_rule(
        &self,
        bucket: &str,
        rule: &str,
        subscriptions: BTreeMap<String, Subscription>,
    ) -> Result<()> {
        let mut validated = Rule::new();
        for (key, subscription) in subscriptions {
            let id = SubscriptionId::from_str(&key)?;
            if subscription.url.is_empty() {
                return Err(CoreError::invalid_input(format!(
                    "subscription {id} is missing a url"
                )));
            }
            validated.insert(id, subscription);
        }

        let _guard = self.write_lock.lock().await;

        let mut record = self
            .store
            .get(bucket)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("bucket {bucket}")))?;

        if validated.is_empty() {
            record.remove(rule);
        } else {
            record.insert(rule.to_string(), validated);
        }

        if record.is_empty() {
            self.store.delete(bucket).await?;
        } else {
            self.store.put(bucket, record).await?;
        }

        debug!(bucket, rule, "rule replaced");
        Ok(())
    }

    /// Removes a subscription and returns the deleted value.
    ///
    /// Fails with `NotFound` when the bucket, rule, or id is absent.
    /// Removing the last subscription under a rule removes the rule;
    /// removing the last rule deletes the bucket key from the store.
    pub async fn delete(
        &self,
        bucket: &str,
        rule: &str,
        id: SubscriptionId,
    ) -> Result<Subscription> {
        let _guard = self.write_lock.lock().await;

        let mut record = self
            .store
            .get(bucket)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("bucket {bucket}")))?;

        let subscriptions = record
            .get_mut(rule)
            .ok_or_else(|| CoreError::not_found(format!("rule {rule} in bucket {bucket}")))?;

        let deleted = subscriptions.remove(&id).ok_or_else(|| {
            CoreError::not_found(format!("subscription {id} in {bucket}/{rule}"))
        })?;

        if subscriptions.is_empty() {
            record.remove(rule);
        }

        if record.is_empty() {
            self.store.delete(bucket).await?;
        } else {
            self.store.put(bucket, record).await?;
        }

        debug!(bucket, rule, subscription_id = %id, "subscription deleted");
        Ok(deleted)
    }
}

/// Validates that a delivery target is a non-empty absolute URL.
fn validate_url(url: &str) -> Result<()> {
    if url.is_empty() {
        return Err(CoreError::invalid_input("url must not be empty"));
    }
    Url::parse(url)
        .map(|_| ())
        .map_err(|e| CoreError::invalid_input(format!("url {url} is not an absolute URL: {e}")))
}
