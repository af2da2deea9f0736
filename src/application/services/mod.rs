//! Services for the application layer.

pub mod creation_service;
pub mod redirect_resolver;
pub mod throttler;

pub use creation_service::CreationService;
pub use redirect_resolver::{RedirectResolver, Resolution};
pub use throttler::{Admission, ClientKey, ThrottlePolicy, Throttler};
