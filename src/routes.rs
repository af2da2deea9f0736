//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`     - Redirect (public, per-IP token bucket)
//! - `GET  /url/{slug}` - Record lookup (public, per-IP token bucket)
//! - `POST /url`        - Create a short URL (creation throttle)
//! - `GET  /health`     - Health check
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Error detail** - Full error stacks outside production
//! - **Rate limiting** - Token bucket on lookups, slow-down + cap on creation
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{fallback_handler, health_handler};
use crate::api::middleware::{error_detail, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the production router with all routes and middleware.
///
/// When `state.behind_proxy` is set, the lookup rate limiter reads client IPs
/// from forwarding headers instead of the peer socket address.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let lookup = api::routes::lookup_routes();
    let lookup = if state.behind_proxy {
        lookup.layer(rate_limit::proxy_layer())
    } else {
        lookup.layer(rate_limit::layer())
    };

    NormalizePathLayer::trim_trailing_slash().layer(compose(state, lookup))
}

/// Constructs the router without the lookup token bucket.
///
/// Used by tests and embedders that apply their own limits.
pub fn service_router(state: AppState) -> Router {
    compose(state, api::routes::lookup_routes())
}

fn compose(state: AppState, lookup: Router<AppState>) -> Router {
    Router::new()
        .merge(api::routes::creation_routes(state.clone()))
        .merge(lookup)
        .route("/health", get(health_handler))
        .fallback(fallback_handler)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            error_detail::layer,
        ))
        .with_state(state)
        .layer(tracing::layer())
}
