//! Subscription registry and durable store interface.
//!
//! Provides the bucket → rule → subscription data model, the store
//! abstraction it persists through, and the registry that owns all
//! mutation of that hierarchy. The delivery crate reads subscriptions
//! through the registry and triggers unsubscription on repeated
//! failure; everything else here is control-plane.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod registry;
pub mod store;

pub use error::{CoreError, Result};
pub use models::{BucketRecord, Event, Rule, Subscription, SubscriptionId};
pub use registry::Registry;
pub use store::{MemoryStore, Store};
