//! Helpers shared across layers.
//!
//! - [`slug_generator`] - Random slug generation
//! - [`validator`] - Slug and URL validation

pub mod slug_generator;
pub mod validator;
