#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use slug_shortener::application::services::{ThrottlePolicy, Throttler};
use slug_shortener::config::Environment;
use slug_shortener::domain::entities::{NewUrlRecord, UrlRecord};
use slug_shortener::domain::repositories::{StoreError, UrlStore};
use slug_shortener::infrastructure::persistence::MemoryUrlStore;
use slug_shortener::routes::service_router;
use slug_shortener::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub fn create_test_state(policy: ThrottlePolicy, environment: Environment) -> AppState {
    create_test_state_with_store(Arc::new(MemoryUrlStore::new()), policy, environment)
}

pub fn create_test_state_with_store(
    store: Arc<dyn UrlStore>,
    policy: ThrottlePolicy,
    environment: Environment,
) -> AppState {
    AppState::new(store, Arc::new(Throttler::new(policy)), environment, false)
}

pub fn create_test_app(state: AppState) -> Router {
    service_router(state).layer(MockConnectInfoLayer)
}

/// Server with an unlimited throttle in development mode.
pub fn create_test_server() -> TestServer {
    let state = create_test_state(ThrottlePolicy::unlimited(), Environment::Development);
    TestServer::new(create_test_app(state)).unwrap()
}

pub fn server_for(state: AppState) -> TestServer {
    TestServer::new(create_test_app(state)).unwrap()
}

/// Store whose every call fails as if the database were down.
pub struct BrokenStore;

#[async_trait]
impl UrlStore for BrokenStore {
    async fn find_by_slug(&self, _slug: &str) -> Result<Option<UrlRecord>, StoreError> {
        Err(StoreError::Backend(sqlx::Error::PoolTimedOut))
    }

    async fn insert_if_absent(&self, _record: NewUrlRecord) -> Result<UrlRecord, StoreError> {
        Err(StoreError::Backend(sqlx::Error::PoolTimedOut))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Err(StoreError::Backend(sqlx::Error::PoolTimedOut))
    }
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
