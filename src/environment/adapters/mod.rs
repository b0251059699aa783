//! Adapter implementations of the environment configuration ports.

pub mod memory;
pub mod postgres;
