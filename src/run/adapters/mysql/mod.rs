//! MySQL query executor backed by `sqlx`.

mod decode;
mod executor;

pub use executor::MySqlQueryExecutor;
