//! Control-plane handlers for subscription management.
//!
//! Thin translation layer between HTTP and the registry: path segments
//! become registry arguments, registry errors become statuses via
//! `ApiError`. No business logic lives here.

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use relay_core::{BucketRecord, Rule, Subscription, SubscriptionId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{error::ApiError, AppState};

/// Request body for subscription creation.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    /// Delivery target, an absolute URL.
    pub url: String,
}

/// Response from subscription creation.
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    /// Generated subscription identifier.
    pub id: SubscriptionId,
}

/// `GET /subscriptions` — every bucket record.
pub async fn list_all(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, BucketRecord>>, ApiError> {
    Ok(Json(state.registry.all().await?))
}

/// `GET /subscriptions/{bucket}` — one bucket's rule map.
pub async fn get_bucket(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> Result<Json<BucketRecord>, ApiError> {
    Ok(Json(state.registry.bucket(&bucket).await?))
}

/// `GET /subscriptions/{bucket}/{rule}` — one rule's subscription map.
pub async fn get_rule(
    State(state): State<AppState>,
    Path((bucket, rule)): Path<(String, String)>,
) -> Result<Json<Rule>, ApiError> {
    Ok(Json(state.registry.rule(&bucket, &rule).await?))
}

/// `GET /subscriptions/{bucket}/{rule}/{id}` — a single subscription.
pub async fn get_subscription(
    State(state): State<AppState>,
    Path((bucket, rule, id)): Path<(String, String, String)>,
) -> Result<Json<Subscription>, ApiError> {
    let id: SubscriptionId = id.parse()?;
    Ok(Json(state.registry.subscription(&bucket, &rule, id).await?))
}

/// `POST /subscriptions/{bucket}/{rule}` — register a new subscription.
#[instrument(skip(state, body), fields(bucket = %bucket, rule = %rule))]
pub async fn create_subscription(
    State(state): State<AppState>,
    Path((bucket, rule)): Path<(String, String)>,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<Json<CreateResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::validation(e.body_text()))?;
    let id = state.registry.create(&bucket, &rule, &request.url).await?;
    Ok(Json(CreateResponse { id }))
}

/// `PUT /subscriptions/{bucket}/{rule}` — bulk-overwrite a rule.
#[instrument(skip(state, body), fields(bucket = %bucket, rule = %rule))]
pub async fn replace_rule(
    State(state): State<AppState>,
    Path((bucket, rule)): Path<(String, String)>,
    body: Result<Json<BTreeMap<String, Subscription>>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(subscriptions) = body.map_err(|e| ApiError::validation(e.body_text()))?;
    state.registry.replace_rule(&bucket, &rule, subscriptions).await?;
    Ok(Json(serde_json::json!({ "status": "replaced" })))
}

/// `DELETE /subscriptions/{bucket}/{rule}/{id}` — returns the deleted
/// subscription.
#[instrument(skip(state), fields(bucket = %bucket, rule = %rule))]
pub async fn delete_subscription(
    State(state): State<AppState>,
    Path((bucket, rule, id)): Path<(String, String, String)>,
) -> Result<Json<Subscription>, ApiError> {
    let id: SubscriptionId = id.parse()?;
    Ok(Json(state.registry.delete(&bucket, &rule, id).await?))
}
