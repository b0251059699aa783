//! Stored SQL tasks.
//!
//! A task couples a SQL statement with the logical database it targets and
//! is addressed by an allocated `TSK-` identifier. The module follows the
//! hexagonal layout used throughout the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
