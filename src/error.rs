//! Application error taxonomy and its HTTP translation.
//!
//! Every component returns typed errors that end up as an [`AppError`]. Its
//! [`IntoResponse`] impl is the single place that maps an error kind to a
//! status code and JSON body.
//!
//! # Body
//!
//! ```json
//! { "code": "slug_in_use", "message": "Slug 'abc' is already in use", "stack": "[redacted]" }
//! ```
//!
//! The body is always rendered redacted. The full [`ErrorReport`] travels in
//! the response extensions so [`crate::api::middleware::error_detail`] can
//! restore the stack outside production.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::time::Duration;

use crate::domain::repositories::StoreError;
use crate::utils::validator::{Field, ValidationError};

/// Placeholder that replaces the stack in production responses.
pub const REDACTED_STACK: &str = "[redacted]";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed slug or URL.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A client-chosen slug is already taken.
    #[error("Slug '{slug}' is already in use")]
    SlugInUse { slug: String },

    /// Generated slugs kept colliding.
    #[error("Could not allocate a unique slug after {attempts} attempts")]
    SlugSpaceExhausted { attempts: usize },

    /// The creation throttle rejected the request.
    #[error("Too many requests, please try again later")]
    RateLimited { retry_after: Duration },

    /// Unknown slug or route.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The store failed or is unreachable.
    #[error("Storage is unavailable")]
    Persistence(#[source] sqlx::Error),

    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::SlugInUse { .. } => StatusCode::BAD_REQUEST,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::SlugSpaceExhausted { .. }
            | AppError::Persistence(_)
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::SlugInUse { .. } => "slug_in_use",
            AppError::SlugSpaceExhausted { .. } => "slug_space_exhausted",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::NotFound { .. } => "not_found",
            AppError::Persistence(_) => "persistence_error",
            AppError::Internal { .. } => "internal_error",
        }
    }

    /// Renders the error and its source chain, outermost first.
    pub fn stack(&self) -> String {
        let mut stack = format!("{}: {}", self.code(), self);
        let mut source = std::error::Error::source(self);

        while let Some(err) = source {
            stack.push_str("\n  caused by: ");
            stack.push_str(&err.to_string());
            source = err.source();
        }

        stack
    }

    /// Builds the report carried by the error response.
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code(),
            message: self.to_string(),
            field: match self {
                AppError::Validation(e) => Some(e.field),
                _ => None,
            },
            stack: self.stack(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { slug } => AppError::SlugInUse { slug },
            StoreError::Backend(e) => AppError::Persistence(e),
        }
    }
}

/// Full description of a failed request.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    pub field: Option<Field>,
    pub stack: String,
}

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub code: &'static str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<Field>,
    pub stack: &'a str,
}

impl ErrorReport {
    /// Body for the client; the stack is replaced unless `detailed`.
    pub fn body(&self, detailed: bool) -> ErrorBody<'_> {
        ErrorBody {
            code: self.code,
            message: &self.message,
            field: self.field,
            stack: if detailed { &self.stack } else { REDACTED_STACK },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let report = self.to_report();

        if status.is_server_error() {
            tracing::error!(code = report.code, stack = %report.stack, "Request failed");
        }

        let mut response = (status, Json(report.body(false))).into_response();

        if let AppError::RateLimited { retry_after } = &self {
            let seconds = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds.max(1)));
        }

        response.extensions_mut().insert(report);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validator::validate_url;

    #[test]
    fn test_status_mapping() {
        let validation = AppError::from(validate_url("nope").unwrap_err());
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let in_use = AppError::SlugInUse {
            slug: "abc".to_string(),
        };
        assert_eq!(in_use.status(), StatusCode::BAD_REQUEST);

        let limited = AppError::RateLimited {
            retry_after: Duration::from_secs(3),
        };
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);

        let exhausted = AppError::SlugSpaceExhausted { attempts: 5 };
        assert_eq!(exhausted.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let persistence = AppError::Persistence(sqlx::Error::PoolTimedOut);
        assert_eq!(persistence.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_conflict_maps_to_slug_in_use() {
        let err = AppError::from(StoreError::Conflict {
            slug: "taken".to_string(),
        });
        assert!(matches!(err, AppError::SlugInUse { ref slug } if slug == "taken"));
    }

    #[test]
    fn test_stack_includes_source_chain() {
        let err = AppError::Persistence(sqlx::Error::PoolTimedOut);
        let stack = err.stack();

        assert!(stack.starts_with("persistence_error: Storage is unavailable"));
        assert!(stack.contains("caused by:"));
    }

    #[test]
    fn test_report_names_validation_field() {
        let report = AppError::from(validate_url("").unwrap_err()).to_report();
        assert_eq!(report.field, Some(Field::Url));
        assert_eq!(report.code, "validation_error");
    }

    #[test]
    fn test_body_redacts_stack() {
        let report = AppError::SlugInUse {
            slug: "abc".to_string(),
        }
        .to_report();

        assert_eq!(report.body(false).stack, REDACTED_STACK);
        assert_eq!(report.body(true).stack, report.stack);
    }

    #[test]
    fn test_rate_limited_response_sets_retry_after() {
        let response = AppError::RateLimited {
            retry_after: Duration::from_millis(1500),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[header::RETRY_AFTER], "2");
        assert!(response.extensions().get::<ErrorReport>().is_some());
    }
}
