//! Port contracts for identifier allocation.

pub mod counter;

pub use counter::{CounterStore, CounterStoreError, CounterStoreResult};
