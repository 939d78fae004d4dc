//! HTTP request handlers.

pub mod health;
pub mod notify;
pub mod subscriptions;

pub use health::health_check;
pub use notify::notify;
pub use subscriptions::{
    create_subscription, delete_subscription, get_bucket, get_rule, get_subscription, list_all,
    replace_rule,
};
