//! DTOs for short URL creation and lookup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::UrlRecord;
use crate::utils::validator::Candidate;

/// Request to create a short URL.
///
/// A missing `url` deserializes to an empty string so the validator reports it
/// like any other invalid URL.
#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    /// Optional client-chosen slug (a random one is generated otherwise).
    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub url: String,
}

impl From<CreateUrlRequest> for Candidate {
    fn from(req: CreateUrlRequest) -> Self {
        Candidate {
            slug: req.slug,
            url: req.url,
        }
    }
}

/// A stored record as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecordResponse {
    pub slug: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl From<UrlRecord> for UrlRecordResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            slug: record.slug,
            url: record.url,
            created_at: record.created_at,
        }
    }
}
