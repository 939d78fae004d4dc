//! Durable key-value store interface.
//!
//! One logical store holds one `BucketRecord` per bucket name. The
//! contract is consumed, not redesigned: atomic get/put/delete per key
//! plus enumeration of all keys. The registry layers its own
//! serialization of read-modify-write sequences on top, so store
//! implementations only need per-operation atomicity.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::Result,
    models::BucketRecord,
};

/// Durable store holding one record per bucket name.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the record for `bucket`, or `None` if absent.
    async fn get(&self, bucket: &str) -> Result<Option<BucketRecord>>;

    /// Persists the whole record for `bucket`, replacing any prior value.
    async fn put(&self, bucket: &str, record: BucketRecord) -> Result<()>;

    /// Removes the record for `bucket`. Deleting an absent key is a no-op.
    async fn delete(&self, bucket: &str) -> Result<()>;

    /// Returns every bucket record keyed by bucket name.
    async fn list(&self) -> Result<BTreeMap<String, BucketRecord>>;
}

/// In-memory store implementation.
///
/// Backs the single store instance in tests and single-process
/// deployments. Each operation takes the lock once, giving the
/// per-operation atomicity the `Store` contract requires.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, BucketRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, bucket: &str) -> Result<Option<BucketRecord>> {
        Ok(self.records.read().await.get(bucket).cloned())
    }

    async fn put(&self, bucket: &str, record: BucketRecord) -> Result<()> {
        self.records.write().await.insert(bucket.to_string(), record);
        Ok(())
    }

    async fn delete(&self, bucket: &str) -> Result<()> {
        self.records.write().await.remove(bucket);
        Ok(())
    }

    async fn list(&self) -> Result<BTreeMap<String, BucketRecord>> {
        Ok(self.records.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rule, Subscription, SubscriptionId};

    fn sample_record() -> BucketRecord {
        let mut rule = Rule::new();
        rule.insert(SubscriptionId::new(), Subscription { url: "https://ex.com/h".to_string() });
        let mut record = BucketRecord::new();
        record.insert("r1".to_string(), rule);
        record
    }

    #[tokio::test]
    async fn get_returns_none_for_absent_bucket() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryStore::new();
        let record = sample_record();

        store.put("b1", record.clone()).await.unwrap();
        assert_eq!(store.get("b1").await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn put_replaces_whole_record() {
        let store = MemoryStore::new();
        store.put("b1", sample_record()).await.unwrap();

        let replacement = BucketRecord::new();
        store.put("b1", replacement.clone()).await.unwrap();
        assert_eq!(store.get("b1").await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn delete_removes_key() {
        let store = MemoryStore::new();
        store.put("b1", sample_record()).await.unwrap();
        store.delete("b1").await.unwrap();

        assert!(store.get("b1").await.unwrap().is_none());
        // deleting again is a no-op
        store.delete("b1").await.unwrap();
    }

    #[tokio::test]
    async fn list_enumerates_all_buckets() {
        let store = MemoryStore::new();
        store.put("b1", sample_record()).await.unwrap();
        store.put("b2", sample_record()).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.contains_key("b1"));
        assert!(all.contains_key("b2"));
    }
}
