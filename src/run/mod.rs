//! Execution of stored tasks against target databases.
//!
//! A run resolves the task's connection settings for one environment,
//! executes the SQL once on a short-lived connection and records the
//! outcome as an append-only run record with its own `RUN-` identifier.
//! The module follows the hexagonal layout used throughout the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
