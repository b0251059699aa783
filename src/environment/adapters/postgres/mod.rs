//! `PostgreSQL` adapters for environment configuration storage.

mod models;
mod repository;
mod schema;

pub use repository::PostgresEnvironmentConfigRepository;
