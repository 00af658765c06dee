//! Ubermelon storefront library.
//!
//! This crate provides the storefront as a library so the binary, the
//! router-level tests and the end-to-end tests all build the same app.
//!
//! # Architecture
//!
//! - Axum web framework, Askama templates for server-side rendering
//! - Read-only catalog and customer directory loaded at startup
//! - Per-visitor cart, identity and flash notices in `tower-sessions`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;

use axum::{Router, body::Body, http::Request, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::cookie::KeyError;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers_middleware,
};
use crate::state::AppState;

/// Build the full application router.
///
/// # Errors
///
/// Returns `KeyError` if the session secret cannot be turned into a signing
/// key.
pub fn app(state: AppState) -> Result<Router, KeyError> {
    let session_layer = create_session_layer(state.config())?;
    let static_dir = state.config().static_dir.clone();

    Ok(Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction()))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
