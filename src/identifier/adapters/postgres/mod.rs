//! `PostgreSQL` adapter for the shared counters.

mod repository;
mod schema;

pub use repository::PostgresCounterStore;
