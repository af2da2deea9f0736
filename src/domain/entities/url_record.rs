//! URL record entity representing a slug mapping.

use chrono::{DateTime, Utc};

/// A persisted mapping from a slug to its target URL.
///
/// Records are created exactly once and never mutated afterwards. The slug is
/// always stored in lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub slug: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(slug: String, url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            slug,
            url,
            created_at,
        }
    }
}

/// Input data for inserting a new record.
///
/// `created_at` is assigned by the store at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub slug: String,
    pub url: String,
}

impl NewUrlRecord {
    /// Builds an insertable record, normalizing the slug to lowercase.
    pub fn new(slug: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            slug: slug.into().to_lowercase(),
            url: url.into(),
        }
    }
}
