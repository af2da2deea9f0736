//! API route configuration.

use crate::api::handlers::{create_url_handler, redirect_handler, url_info_handler};
use crate::api::middleware::client_key;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creation routes. Every request is tagged with its client key for the
/// creation throttle.
///
/// # Endpoints
///
/// - `POST /url` - Create a short URL
pub fn creation_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/url", post(create_url_handler))
        .route_layer(middleware::from_fn_with_state(state, client_key::layer))
}

/// Public lookup routes.
///
/// # Endpoints
///
/// - `GET /{slug}`     - Redirect to the stored URL
/// - `GET /url/{slug}` - Stored record as JSON
pub fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(redirect_handler))
        .route("/url/{slug}", get(url_info_handler))
}
