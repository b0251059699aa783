//! In-memory integration tests for the task registry.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::helpers::{Stack, stack};
use sqlrun::listing::PageRequest;
use sqlrun::task::services::{CreateTaskRequest, TaskServiceError, UpdateTaskRequest};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_pages_in_creation_order(stack: Stack) {
    for n in 1..=11 {
        stack
            .register_task(&format!("SELECT {n}"), "SELECT")
            .await
            .expect("task creation should succeed");
    }

    let first = stack
        .tasks
        .list(&PageRequest::new(0, 10))
        .await
        .expect("listing should succeed");
    let rest = stack
        .tasks
        .list(&PageRequest::new(10, 10))
        .await
        .expect("listing should succeed");

    assert_eq!(first.len(), 10);
    assert_eq!(first.first().map(|task| task.id().to_string()).as_deref(), Some("TSK-000001"));
    assert_eq!(rest.len(), 1);
    assert_eq!(rest.first().map(|task| task.id().to_string()).as_deref(), Some("TSK-000011"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_receive_distinct_contiguous_ids(stack: Stack) {
    let tasks = Arc::new(stack.tasks);
    let handles = (0..32)
        .map(|n| {
            let service = Arc::clone(&tasks);
            tokio::spawn(async move {
                service
                    .create(CreateTaskRequest::new(
                        format!("Task {n}"),
                        "sales",
                        "SELECT 1",
                        "SELECT",
                        "alice",
                    ))
                    .await
            })
        })
        .collect::<Vec<_>>();

    let mut values = BTreeSet::new();
    for handle in handles {
        let task = handle
            .await
            .expect("task joins")
            .expect("creation succeeds");
        assert!(values.insert(task.id().value()), "duplicate {}", task.id());
    }

    assert_eq!(values, (1..=32).collect::<BTreeSet<u64>>());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_identifiers_are_never_reissued(stack: Stack) {
    let first = stack
        .register_task("SELECT 1", "SELECT")
        .await
        .expect("task creation should succeed");
    stack
        .tasks
        .delete(first.id())
        .await
        .expect("delete should succeed");

    let second = stack
        .register_task("SELECT 2", "SELECT")
        .await
        .expect("task creation should succeed");

    assert_eq!(second.id().to_string(), "TSK-000002");
    assert!(matches!(
        stack.tasks.get(first.id()).await,
        Err(TaskServiceError::NotFound(id)) if id == first.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_changes_only_supplied_fields(stack: Stack) {
    let created = stack
        .register_task("SELECT 1", "SELECT")
        .await
        .expect("task creation should succeed");

    let updated = stack
        .tasks
        .update(
            created.id(),
            UpdateTaskRequest::new()
                .with_sql_query("DELETE FROM carts WHERE id = 4")
                .with_query_type("delete"),
        )
        .await
        .expect("update should succeed");

    assert_eq!(updated.sql_query(), "DELETE FROM carts WHERE id = 4");
    assert_eq!(updated.query_type().as_str(), "DELETE");
    assert_eq!(updated.description(), created.description());
    assert_eq!(updated.created_at(), created.created_at());
    assert!(updated.updated_at().is_some());
}
