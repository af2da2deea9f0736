//! Handler for looking up a stored record.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::create_url::UrlRecordResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the record behind a slug without redirecting.
///
/// # Endpoint
///
/// `GET /url/{slug}`
///
/// # Errors
///
/// Returns 404 for unknown slugs and, like redirects, when the store fails.
pub async fn url_info_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlRecordResponse>, AppError> {
    state
        .redirect_resolver
        .lookup(&slug)
        .await
        .map(|record| Json(record.into()))
        .ok_or(AppError::NotFound { resource: slug })
}
