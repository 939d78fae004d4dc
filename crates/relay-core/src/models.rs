//! Domain model for the bucket → rule → subscription hierarchy.
//!
//! Defines the persisted record types, the strongly-typed subscription
//! identifier, and the inbound event shape. `BucketRecord` is the unit
//! of store atomicity: one JSON-serializable value per bucket holding
//! every rule and subscription registered under it.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Strongly-typed subscription identifier.
///
/// Wraps a UUID v4 assigned by the registry at creation time, never
/// supplied by the client. Unique within its rule; global uniqueness
/// follows from random generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    /// Creates a new random subscription ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for SubscriptionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for SubscriptionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| CoreError::invalid_input(format!("malformed subscription id: {s}")))
    }
}

/// A single webhook target registered under a (bucket, rule) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Delivery target. Invariant: a syntactically valid absolute URL.
    pub url: String,
}

/// Subscriber set for one rule, keyed by subscription ID.
///
/// Never persisted empty: removing the last subscription removes the
/// rule from its bucket record.
pub type Rule = BTreeMap<SubscriptionId, Subscription>;

/// Full rule set persisted for one bucket, keyed by rule name.
///
/// The store's unit of atomicity. Never persisted empty: removing the
/// last rule deletes the bucket key entirely.
pub type BucketRecord = BTreeMap<String, Rule>;

/// An inbound storage event to fan out.
///
/// Supplied externally per notification; immutable and never persisted.
/// Everything beyond the routing fields is carried opaquely in
/// `payload` and forwarded to subscribers verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Bucket the event originated from.
    pub bucket_name: String,
    /// Rule that matched this event at the source.
    pub matched_rule_name: String,
    /// Remaining event fields, forwarded untouched.
    #[serde(flatten)]
    pub payload: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_id_parses_valid_uuid() {
        let id = SubscriptionId::new();
        let parsed: SubscriptionId = id.to_string().parse().expect("round-trip should parse");
        assert_eq!(parsed, id);
    }

    #[test]
    fn subscription_id_rejects_garbage() {
        let result = "not-a-uuid".parse::<SubscriptionId>();
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }

    #[test]
    fn generated_ids_are_v4() {
        let id = SubscriptionId::new();
        assert_eq!(id.0.get_version_num(), 4);
    }

    #[test]
    fn event_deserializes_wire_shape() {
        let event: Event = serde_json::from_str(
            r#"{"bucketName":"b1","matchedRuleName":"r1","key":"object.txt","size":42}"#,
        )
        .expect("event should deserialize");

        assert_eq!(event.bucket_name, "b1");
        assert_eq!(event.matched_rule_name, "r1");
        assert_eq!(event.payload["key"], "object.txt");
        assert_eq!(event.payload["size"], 42);
    }

    #[test]
    fn event_round_trips_payload() {
        let event = Event {
            bucket_name: "b1".to_string(),
            matched_rule_name: "r1".to_string(),
            payload: serde_json::json!({"key": "a/b.txt"}),
        };

        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["bucketName"], "b1");
        assert_eq!(json["key"], "a/b.txt");
    }

    #[test]
    fn bucket_record_serializes_with_string_keys() {
        let id = SubscriptionId::new();
        let mut rule = Rule::new();
        rule.insert(id, Subscription { url: "https://ex.com/hook".to_string() });
        let mut record = BucketRecord::new();
        record.insert("r1".to_string(), rule);

        let json = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["r1"][id.to_string()]["url"], "https://ex.com/hook");
    }
}
