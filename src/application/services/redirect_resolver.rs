//! Slug resolution for redirects.

use std::sync::Arc;

use metrics::counter;
use tracing::error;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlStore;

/// Outcome of resolving a slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Redirect the client to this URL.
    Redirect(String),
    NotFound,
}

/// Resolves slugs against the store.
///
/// Store failures are logged and reported exactly like a miss, so callers
/// cannot tell a broken backend from an unknown slug.
pub struct RedirectResolver {
    store: Arc<dyn UrlStore>,
}

impl RedirectResolver {
    pub fn new(store: Arc<dyn UrlStore>) -> Self {
        Self { store }
    }

    /// Resolves `slug` to its redirect target.
    pub async fn resolve(&self, slug: &str) -> Resolution {
        match self.lookup(slug).await {
            Some(record) => {
                counter!("redirects_total").increment(1);
                Resolution::Redirect(record.url)
            }
            None => Resolution::NotFound,
        }
    }

    /// Looks up the record for `slug`, case-insensitively.
    pub async fn lookup(&self, slug: &str) -> Option<UrlRecord> {
        let slug = slug.to_lowercase();

        match self.store.find_by_slug(&slug).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                counter!("redirect_misses_total").increment(1);
                None
            }
            Err(e) => {
                error!(%slug, error = ?e, "Slug lookup failed");
                counter!("redirect_misses_total").increment(1);
                None
            }
        }
    }
}
