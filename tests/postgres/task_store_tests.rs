//! Task repository tests against `PostgreSQL`.

use crate::postgres::helpers::{prepared_database, task};
use mockable::DefaultClock;
use rstest::rstest;
use sqlrun::listing::PageRequest;
use sqlrun::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::TaskPatch,
    ports::{TaskRepository, TaskRepositoryError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_then_find_round_trips() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let repository = PostgresTaskRepository::new(database.pool());
    let original = task(1, "Daily report", "sales");

    repository.store(&original).await.expect("store succeeds");
    let found = repository
        .find_by_id(original.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");

    assert_eq!(found.id(), original.id());
    assert_eq!(found.description(), "Daily report");
    assert_eq!(found.sql_query(), original.sql_query());
    assert_eq!(found.updated_at(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_identifier_is_rejected() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let repository = PostgresTaskRepository::new(database.pool());
    let original = task(1, "Daily report", "sales");
    repository.store(&original).await.expect("store succeeds");

    let result = repository.store(&task(1, "Other", "sales")).await;

    assert!(matches!(
        result,
        Err(TaskRepositoryError::DuplicateTask(id)) if id == original.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_and_delete_report_missing_tasks() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let repository = PostgresTaskRepository::new(database.pool());
    let missing = task(9, "Ghost", "sales");

    assert!(matches!(
        repository.update(&missing).await,
        Err(TaskRepositoryError::NotFound(_))
    ));
    assert!(matches!(
        repository.delete(missing.id()).await,
        Err(TaskRepositoryError::NotFound(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_persists_changed_fields() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let repository = PostgresTaskRepository::new(database.pool());
    let mut stored = task(1, "Daily report", "sales");
    repository.store(&stored).await.expect("store succeeds");

    let patch = TaskPatch::new()
        .with_sql_query("DELETE FROM orders WHERE id = 1")
        .and_then(|next| next.with_query_type("delete"))
        .expect("valid patch");
    stored.apply(patch, &DefaultClock);
    repository.update(&stored).await.expect("update succeeds");

    let found = repository
        .find_by_id(stored.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(found.sql_query(), "DELETE FROM orders WHERE id = 1");
    assert_eq!(found.query_type().as_str(), "DELETE");
    assert!(found.updated_at().is_some());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_pages_and_searches_case_insensitively() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let repository = PostgresTaskRepository::new(database.pool());
    for value in 1..=11 {
        let db_name = if value <= 5 { "billing" } else { "sales" };
        repository
            .store(&task(value, &format!("Report {value}"), db_name))
            .await
            .expect("store succeeds");
    }

    let second_page = repository
        .list(&PageRequest::new(10, 10))
        .await
        .expect("listing succeeds");
    let billing = repository
        .list(&PageRequest::default().with_search("BILL"))
        .await
        .expect("listing succeeds");
    let literal_percent = repository
        .list(&PageRequest::default().with_search("%"))
        .await
        .expect("listing succeeds");

    assert_eq!(
        second_page.iter().map(|found| found.id().to_string()).collect::<Vec<_>>(),
        ["TSK-000011"]
    );
    assert_eq!(billing.len(), 5);
    assert!(literal_percent.is_empty());
}
