//! Short URL creation service.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info, warn};

use crate::application::services::throttler::{Admission, ClientKey, Throttler};
use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::repositories::{StoreError, UrlStore};
use crate::error::AppError;
use crate::utils::slug_generator::SlugGenerator;
use crate::utils::validator::{Candidate, validate};

/// Maximum number of generated slugs tried before giving up.
pub const MAX_SLUG_ATTEMPTS: usize = 5;

/// Creates new slug mappings.
///
/// A request moves through throttling, validation, slug assignment and
/// persistence; any failing stage ends it with a typed [`AppError`].
pub struct CreationService {
    store: Arc<dyn UrlStore>,
    generator: Arc<dyn SlugGenerator>,
    throttler: Arc<Throttler>,
}

impl CreationService {
    pub fn new(
        store: Arc<dyn UrlStore>,
        generator: Arc<dyn SlugGenerator>,
        throttler: Arc<Throttler>,
    ) -> Self {
        Self {
            store,
            generator,
            throttler,
        }
    }

    /// Creates a short URL for `candidate` on behalf of `client`.
    ///
    /// # Slug assignment
    ///
    /// - Client-supplied slugs are lowercased and inserted once; a taken slug
    ///   fails with [`AppError::SlugInUse`] and is never renegotiated
    /// - Otherwise a random slug is generated, retrying on collision up to
    ///   [`MAX_SLUG_ATTEMPTS`] times
    ///
    /// # Errors
    ///
    /// - [`AppError::RateLimited`] if the throttle rejects the client
    /// - [`AppError::Validation`] for a malformed slug or URL
    /// - [`AppError::SlugInUse`] if the requested slug is taken
    /// - [`AppError::SlugSpaceExhausted`] if every generated slug collided
    /// - [`AppError::Persistence`] on storage failures
    pub async fn create(
        &self,
        candidate: Candidate,
        client: &ClientKey,
    ) -> Result<UrlRecord, AppError> {
        self.admit(client).await?;
        self.create_admitted(candidate, client).await
    }

    /// Counts a creation attempt by `client`, sleeping if it is slowed down.
    ///
    /// Callers that must decode the request before they have a [`Candidate`]
    /// call this first so undecodable requests are still counted, then finish
    /// with [`CreationService::create_admitted`].
    ///
    /// # Errors
    ///
    /// [`AppError::RateLimited`] if the client is over the hard cap.
    pub async fn admit(&self, client: &ClientKey) -> Result<(), AppError> {
        match self.throttler.admit(client) {
            Admission::Allowed => Ok(()),
            Admission::Delayed(delay) => {
                debug!(%client, delay_ms = delay.as_millis() as u64, "Slowing down creation");
                counter!("throttle_decisions_total", "decision" => "delayed").increment(1);
                tokio::time::sleep(delay).await;
                Ok(())
            }
            Admission::Rejected { retry_after } => {
                warn!(%client, retry_after_secs = retry_after.as_secs(), "Creation rate limit hit");
                counter!("throttle_decisions_total", "decision" => "rejected").increment(1);
                Err(AppError::RateLimited { retry_after })
            }
        }
    }

    /// Validates and persists `candidate` for a client that already passed
    /// [`CreationService::admit`].
    pub async fn create_admitted(
        &self,
        candidate: Candidate,
        client: &ClientKey,
    ) -> Result<UrlRecord, AppError> {
        let input = validate(&candidate)?;

        let record = match input.slug {
            Some(slug) => self.insert_requested(slug, input.url).await?,
            None => self.insert_generated(input.url).await?,
        };

        info!(slug = %record.slug, %client, "Short URL created");
        counter!("urls_created_total").increment(1);

        Ok(record)
    }

    async fn insert_requested(&self, slug: String, url: String) -> Result<UrlRecord, AppError> {
        Ok(self
            .store
            .insert_if_absent(NewUrlRecord::new(slug, url))
            .await?)
    }

    async fn insert_generated(&self, url: String) -> Result<UrlRecord, AppError> {
        for attempt in 1..=MAX_SLUG_ATTEMPTS {
            let new_record = NewUrlRecord::new(self.generator.generate(), url.clone());

            match self.store.insert_if_absent(new_record).await {
                Ok(record) => return Ok(record),
                Err(StoreError::Conflict { slug }) => {
                    warn!(%slug, attempt, "Generated slug collided");
                }
                Err(StoreError::Backend(e)) => return Err(AppError::Persistence(e)),
            }
        }

        Err(AppError::SlugSpaceExhausted {
            attempts: MAX_SLUG_ATTEMPTS,
        })
    }
}
