//! In-memory counter store for tests and single-process tooling.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::identifier::{
    domain::CounterType,
    ports::{CounterStore, CounterStoreError, CounterStoreResult},
};

/// Largest value the `PostgreSQL` adapter can persist; mirrored here so both
/// adapters exhaust at the same point.
const MAX_COUNTER_VALUE: u64 = i64::MAX as u64;

/// Thread-safe in-memory counter store.
///
/// The mutex is held across the read-modify-write, which makes increments
/// atomic within one process only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCounterStore {
    counters: Arc<Mutex<HashMap<CounterType, u64>>>,
}

impl InMemoryCounterStore {
    /// Creates an empty store with no seeded counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with every counter category seeded at 0.
    #[must_use]
    pub fn seeded() -> Self {
        let counters = CounterType::ALL.into_iter().map(|kind| (kind, 0)).collect();
        Self {
            counters: Arc::new(Mutex::new(counters)),
        }
    }

    fn lock(&self) -> CounterStoreResult<std::sync::MutexGuard<'_, HashMap<CounterType, u64>>> {
        self.counters
            .lock()
            .map_err(|err| CounterStoreError::persistence(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn seed(&self, counter_type: CounterType) -> CounterStoreResult<()> {
        self.lock()?.entry(counter_type).or_insert(0);
        Ok(())
    }

    async fn increment(&self, counter_type: CounterType) -> CounterStoreResult<u64> {
        let mut counters = self.lock()?;
        let value = counters
            .get_mut(&counter_type)
            .ok_or(CounterStoreError::NotSeeded(counter_type))?;
        if *value >= MAX_COUNTER_VALUE {
            return Err(CounterStoreError::Overflow(counter_type));
        }
        *value += 1;
        Ok(*value)
    }

    async fn current(&self, counter_type: CounterType) -> CounterStoreResult<Option<u64>> {
        Ok(self.lock()?.get(&counter_type).copied())
    }
}
