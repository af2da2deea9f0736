//! HTTP request handlers.

pub mod create_url;
pub mod health;
pub mod redirect;
pub mod url_info;

pub use create_url::create_url_handler;
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use url_info::url_info_handler;

use axum::http::Uri;

use crate::error::AppError;

/// Answers unmatched routes with the JSON not-found body.
pub async fn fallback_handler(uri: Uri) -> AppError {
    AppError::NotFound {
        resource: uri.path().to_string(),
    }
}
