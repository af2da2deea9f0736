//! Infrastructure layer implementing the storage contracts defined by the
//! domain layer.
//!
//! - [`persistence`] - PostgreSQL and in-memory URL stores

pub mod persistence;
