//! Human-readable identifier allocation.
//!
//! A shared counter per category is incremented atomically and the new
//! value is rendered as `PREFIX-######`. The module follows the same
//! hexagonal layout as the record contexts:
//!
//! - Domain types in [`domain`]
//! - The counter store contract in [`ports`]
//! - In-memory and `PostgreSQL` stores in [`adapters`]
//! - The allocator in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
