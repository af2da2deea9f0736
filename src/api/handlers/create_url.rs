//! Handler for short URL creation.

use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};

use crate::api::dto::create_url::{CreateUrlRequest, UrlRecordResponse};
use crate::application::services::ClientKey;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::validator::{Field, ValidationError};

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /url`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "slug": "my-link" }
/// ```
///
/// `slug` is optional; without it a random 5-character slug is generated.
///
/// # Response
///
/// ```json
/// { "slug": "my-link", "url": "https://example.com", "createdAt": "2024-06-01T12:00:00Z" }
/// ```
///
/// # Errors
///
/// - 400 for an unreadable body, an invalid slug or URL, or a slug in use
/// - 429 when the client exceeded its creation allowance
/// - 500 when the store fails
///
/// Every request counts against the creation throttle, including ones whose
/// body cannot be decoded. The client key is put in the request extensions by
/// [`crate::api::middleware::client_key`].
pub async fn create_url_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientKey>,
    payload: Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Json<UrlRecordResponse>, AppError> {
    let service = &state.creation_service;
    service.admit(&client).await?;

    let Json(payload) =
        payload.map_err(|rejection| ValidationError::new(Field::Body, rejection.body_text()))?;

    let record = service.create_admitted(payload.into(), &client).await?;

    Ok(Json(record.into()))
}
