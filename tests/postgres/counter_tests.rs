//! Counter store tests against `PostgreSQL`.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::postgres::helpers::prepared_database;
use rstest::rstest;
use sqlrun::identifier::{
    adapters::postgres::PostgresCounterStore,
    domain::CounterType,
    ports::CounterStore,
    services::IdAllocator,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn migrations_seed_every_counter_at_zero() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let store = PostgresCounterStore::new(database.pool());

    for counter_type in CounterType::ALL {
        assert_eq!(
            store.current(counter_type).await.expect("counter read"),
            Some(0),
            "{counter_type} counter"
        );
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn allocators_on_separate_pools_share_one_sequence() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let allocators = [
        IdAllocator::new(Arc::new(PostgresCounterStore::new(database.pool()))),
        IdAllocator::new(Arc::new(PostgresCounterStore::new(database.pool()))),
    ];

    let handles = (0..40)
        .zip(allocators.iter().cycle())
        .map(|(_, allocator)| {
            let worker = allocator.clone();
            tokio::spawn(async move { worker.allocate_run_id().await })
        })
        .collect::<Vec<_>>();

    let mut values = BTreeSet::new();
    for handle in handles {
        let id = handle
            .await
            .expect("task joins")
            .expect("allocation succeeds");
        assert!(values.insert(id.value()), "duplicate identifier {id}");
    }
    assert_eq!(values, (1..=40).collect::<BTreeSet<u64>>());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeding_again_keeps_the_current_value() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let allocator = IdAllocator::new(Arc::new(PostgresCounterStore::new(database.pool())));
    allocator
        .allocate_task_id()
        .await
        .expect("allocation succeeds");

    allocator.seed_all().await.expect("seeding succeeds");
    let next = allocator
        .allocate_task_id()
        .await
        .expect("allocation succeeds");

    assert_eq!(next.to_string(), "TSK-000002");
}
