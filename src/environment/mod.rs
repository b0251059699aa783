//! Environment-scoped connection settings for target databases.
//!
//! Each logical database name (a task's `db_name`) maps to one set of
//! connection parameters per environment tag. The run executor reads these
//! on every execution; they are managed administratively.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
