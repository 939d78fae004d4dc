//! HTTP server configuration and request routing.
//!
//! Routes:
//!
//! ```text
//! GET    /health
//! GET    /subscriptions
//! GET    /subscriptions/{bucket}
//! GET    /subscriptions/{bucket}/{rule}
//! POST   /subscriptions/{bucket}/{rule}
//! PUT    /subscriptions/{bucket}/{rule}
//! GET    /subscriptions/{bucket}/{rule}/{id}
//! DELETE /subscriptions/{bucket}/{rule}/{id}
//! POST   /notify
//! ```
//!
//! Unknown methods on known paths get the router's standard 405.
//! Requests flow through request-id injection, tracing, a timeout
//! layer, and the signature boundary before reaching a handler.

use std::{net::SocketAddr, time::Duration};

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{handlers, middleware::signature_middleware, AppState};

/// Creates the router with all routes and middleware.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    if state.shared_secret.is_none() {
        warn!("no shared secret configured, signature verification is DISABLED");
    }

    let api_routes = Router::new()
        .route("/subscriptions", get(handlers::list_all))
        .route("/subscriptions/{bucket}", get(handlers::get_bucket))
        .route(
            "/subscriptions/{bucket}/{rule}",
            get(handlers::get_rule)
                .post(handlers::create_subscription)
                .put(handlers::replace_rule),
        )
        .route(
            "/subscriptions/{bucket}/{rule}/{id}",
            get(handlers::get_subscription).delete(handlers::delete_subscription),
        )
        .route("/notify", axum::routing::post(handlers::notify))
        .layer(middleware::from_fn_with_state(state.clone(), signature_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .merge(api_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .with_state(state)
}

/// Middleware tagging every request and response with an `X-Request-Id`.
async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;
    if let Ok(value) = request_id.parse() {
        response.headers_mut().insert("X-Request-Id", value);
    }
    response
}

/// Starts the HTTP server with graceful shutdown support.
///
/// # Errors
///
/// Returns `std::io::Error` if the port is already in use or the
/// network interface is unavailable.
pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    request_timeout: Duration,
) -> Result<(), std::io::Error> {
    let app = create_router(state, request_timeout);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Resolves when the process receives CTRL+C or SIGTERM.
async fn shutdown_signal() {
    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            },
            Err(e) => tracing::error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "failed to install CTRL+C handler");
            }
            info!("received CTRL+C, starting graceful shutdown");
        },
        () = sigterm => {
            info!("received SIGTERM, starting graceful shutdown");
        },
    }
}
