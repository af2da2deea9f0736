//! Handler for slug redirects.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::application::services::Resolution;
use crate::error::AppError;
use crate::state::AppState;

/// Not-found page for browsers.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
struct NotFoundTemplate {
    slug: String,
}

/// Redirects a slug to its stored URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Responses
///
/// - **302 Found** with `Location` set to the stored URL
/// - **404 Not Found** as an HTML page when the client accepts `text/html`,
///   otherwise as a JSON error body
///
/// Slugs are matched case-insensitively. Store failures produce the same 404
/// as an unknown slug.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    match state.redirect_resolver.resolve(&slug).await {
        Resolution::Redirect(url) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        Resolution::NotFound if accepts_html(&headers) => {
            (StatusCode::NOT_FOUND, NotFoundTemplate { slug }).into_response()
        }
        Resolution::NotFound => AppError::NotFound { resource: slug }.into_response(),
    }
}

fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}
