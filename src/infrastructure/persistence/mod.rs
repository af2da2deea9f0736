//! URL store implementations.
//!
//! - [`PgUrlStore`] - PostgreSQL, durable; uniqueness enforced by a constraint
//! - [`MemoryUrlStore`] - in-process map for tests and local experiments

pub mod db_error;
pub mod memory_url_store;
pub mod pg_url_store;

pub use memory_url_store::MemoryUrlStore;
pub use pg_url_store::PgUrlStore;
