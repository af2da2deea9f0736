//! In-process URL store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, PoisonError};

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, UrlStore};

/// Non-durable store backed by a mutex-guarded map.
///
/// Check and insert happen under one lock acquisition, so racing inserts of
/// the same slug still see exactly one winner. Records vanish with the
/// process; use [`super::PgUrlStore`] for anything that must survive a restart.
#[derive(Debug, Default)]
pub struct MemoryUrlStore {
    records: Mutex<HashMap<String, UrlRecord>>,
}

impl MemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<UrlRecord>, StoreError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(slug).cloned())
    }

    async fn insert_if_absent(&self, record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);

        match records.entry(record.slug) {
            Entry::Occupied(existing) => Err(StoreError::Conflict {
                slug: existing.key().clone(),
            }),
            Entry::Vacant(slot) => {
                let stored = UrlRecord::new(slot.key().clone(), record.url, Utc::now());
                Ok(slot.insert(stored).clone())
            }
        }
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.len() as u64)
    }
}
