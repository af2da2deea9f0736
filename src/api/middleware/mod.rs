//! HTTP middleware for request processing and protection.

pub mod client_key;
pub mod error_detail;
pub mod rate_limit;
pub mod tracing;
