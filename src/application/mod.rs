//! Application layer services implementing business logic.
//!
//! Services consume the storage trait and give HTTP handlers a small API.
//!
//! - [`services::CreationService`] - Throttled, validated short URL creation
//! - [`services::RedirectResolver`] - Slug to target resolution
//! - [`services::Throttler`] - Per-client slow-down and rate limiting

pub mod services;
