//! Restores full error detail outside production.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::ErrorReport;
use crate::state::AppState;

/// Rewrites error bodies to include the stack when not in production.
///
/// [`crate::error::AppError`] always renders a redacted body and attaches an
/// [`ErrorReport`] to the response. In production this layer passes responses
/// through untouched; otherwise it re-renders the body from the report.
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    if st.environment.is_production() {
        return response;
    }

    let Some(report) = response.extensions().get::<ErrorReport>() else {
        return response;
    };

    let rendered = serde_json::to_vec(&report.body(true));

    match rendered {
        Ok(bytes) => {
            response.headers_mut().remove(header::CONTENT_LENGTH);
            *response.body_mut() = Body::from(bytes);
        }
        Err(e) => tracing::warn!(error = %e, "Failed to render detailed error body"),
    }

    response
}
