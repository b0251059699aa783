//! Adapter implementations of the run ports.

pub mod memory;
pub mod mysql;
pub mod postgres;
pub mod scripted;
