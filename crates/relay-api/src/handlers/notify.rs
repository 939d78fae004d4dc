//! Notification intake.
//!
//! The inbound request is acknowledged as soon as the batch parses;
//! fan-out runs as a detached task with no result channel back to the
//! caller. Submitters always see the acknowledgment regardless of
//! downstream delivery outcome.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use relay_core::Event;
use tracing::{info, instrument};

use crate::{error::ApiError, AppState};

/// `POST /notify` — accepts an ordered batch of events for fan-out.
#[instrument(skip(state, body))]
pub async fn notify(
    State(state): State<AppState>,
    body: Result<Json<Vec<Event>>, JsonRejection>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let Json(events) = body.map_err(|e| ApiError::validation(e.body_text()))?;

    info!(batch_size = events.len(), "notification batch accepted");

    let engine = Arc::clone(&state.engine);
    let max_attempts = state.max_delivery_attempts;
    tokio::spawn(async move {
        engine.process_batch(events, max_attempts).await;
    });

    Ok((StatusCode::ACCEPTED, Json(serde_json::json!({ "status": "accepted" }))))
}
