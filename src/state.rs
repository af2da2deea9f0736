//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::{CreationService, RedirectResolver, Throttler};
use crate::config::Environment;
use crate::domain::repositories::UrlStore;
use crate::utils::slug_generator::{RandomSlugGenerator, SlugGenerator};

/// Application state shared across handlers.
///
/// The store handle is passed in explicitly; nothing reaches storage through
/// globals.
#[derive(Clone)]
pub struct AppState {
    pub creation_service: Arc<CreationService>,
    pub redirect_resolver: Arc<RedirectResolver>,
    pub store: Arc<dyn UrlStore>,
    pub environment: Environment,
    /// Read client IPs from forwarding headers instead of the peer address.
    pub behind_proxy: bool,
}

impl AppState {
    /// Wires services around `store` with the default random slug generator.
    pub fn new(
        store: Arc<dyn UrlStore>,
        throttler: Arc<Throttler>,
        environment: Environment,
        behind_proxy: bool,
    ) -> Self {
        Self::with_generator(
            store,
            Arc::new(RandomSlugGenerator::default()),
            throttler,
            environment,
            behind_proxy,
        )
    }

    pub fn with_generator(
        store: Arc<dyn UrlStore>,
        generator: Arc<dyn SlugGenerator>,
        throttler: Arc<Throttler>,
        environment: Environment,
        behind_proxy: bool,
    ) -> Self {
        Self {
            creation_service: Arc::new(CreationService::new(
                store.clone(),
                generator,
                throttler,
            )),
            redirect_resolver: Arc::new(RedirectResolver::new(store.clone())),
            store,
            environment,
            behind_proxy,
        }
    }
}
