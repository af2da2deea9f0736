//! Store trait for slug to URL mappings.

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use async_trait::async_trait;

/// Errors reported by a [`UrlStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another record already owns this slug.
    #[error("slug '{slug}' already exists")]
    Conflict { slug: String },

    /// The storage backend failed or is unreachable.
    #[error("storage backend error")]
    Backend(#[from] sqlx::Error),
}

/// Durable mapping from slug to [`UrlRecord`].
///
/// The store is the only writer of records and the only place where slug
/// uniqueness is enforced.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryUrlStore`] - in-process, non-durable
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Finds a record by its (already lowercased) slug.
    ///
    /// A miss is `Ok(None)`, never an error.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Inserts a record unless its slug is taken.
    ///
    /// Must be atomic with respect to slug uniqueness: when two callers race on
    /// the same slug exactly one succeeds and the other gets
    /// [`StoreError::Conflict`].
    async fn insert_if_absent(&self, record: NewUrlRecord) -> Result<UrlRecord, StoreError>;

    /// Counts stored records.
    async fn count(&self) -> Result<u64, StoreError>;
}
