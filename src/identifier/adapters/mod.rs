//! Adapter implementations for the counter store port.

pub mod memory;
pub mod postgres;
