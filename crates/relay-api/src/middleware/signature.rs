//! Shared-secret signature boundary.
//!
//! Buffers the request body, verifies its HMAC-SHA256 signature from
//! the `X-Relay-Signature` header, and rebuilds the request for the
//! handler. Requests failing verification never reach the registry or
//! engine.

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::{crypto, AppState};

const SIGNATURE_HEADER: &str = "x-relay-signature";

// Bodies are small JSON documents; cap buffering well above any
// realistic subscription or notification payload.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Rejections produced by the signature boundary.
#[derive(Debug)]
pub enum SignatureRejection {
    /// The signature header is missing.
    MissingSignature,
    /// The signature does not match the request body.
    InvalidSignature,
    /// The request body could not be buffered.
    UnreadableBody,
}

impl IntoResponse for SignatureRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingSignature => (StatusCode::UNAUTHORIZED, "missing signature header"),
            Self::InvalidSignature => (StatusCode::UNAUTHORIZED, "signature mismatch"),
            Self::UnreadableBody => (StatusCode::BAD_REQUEST, "unreadable request body"),
        };
        (status, message).into_response()
    }
}

/// Axum middleware verifying the shared-secret body signature.
pub async fn signature_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, SignatureRejection> {
    let Some(secret) = state.shared_secret.clone() else {
        // No secret configured: boundary disabled (development mode).
        return Ok(next.run(req).await);
    };

    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .ok_or(SignatureRejection::MissingSignature)?;

    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| SignatureRejection::UnreadableBody)?;

    if !crypto::verify(&bytes, &signature, &secret) {
        warn!(path = %parts.uri.path(), "rejected request with invalid signature");
        return Err(SignatureRejection::InvalidSignature);
    }

    let req = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(req).await)
}
