//! Run repository tests against `PostgreSQL`.

use crate::postgres::helpers::prepared_database;
use mockable::DefaultClock;
use rstest::rstest;
use serde_json::json;
use sqlrun::environment::domain::Environment;
use sqlrun::identifier::domain::{CounterType, SequenceId};
use sqlrun::listing::PageRequest;
use sqlrun::run::{
    adapters::postgres::PostgresRunRepository,
    domain::{Run, RunId, RunRecord, RunStatus},
    ports::{RunRepository, RunRepositoryError},
};
use sqlrun::task::domain::TaskId;

fn run(value: u64, status: RunStatus) -> Run {
    let id = RunId::parse(&SequenceId::new(CounterType::Run, value).expect("non-zero").to_string())
        .expect("valid run id");
    let record = RunRecord {
        task_id: TaskId::parse("TSK-000001").expect("valid task id"),
        environment: Environment::new("prod").expect("valid environment"),
        status,
        message: "Query executed successfully. Rows returned: 1".to_owned(),
        data: serde_json::from_value(json!([{"zeta": 1, "alpha": "a", "mid": null}]))
            .expect("rows"),
        truncated: false,
        rows_affected: Some(0),
        rollback_query: Some("DELETE FROM t WHERE id IN (1);".to_owned()),
        execution_time_ms: 42,
        task_description: "Lookup".to_owned(),
        sql_query: "SELECT zeta, alpha, mid FROM t".to_owned(),
        created_by: "carol".to_owned(),
    };
    Run::new(id, record, &DefaultClock)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_run_keeps_row_column_order() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let repository = PostgresRunRepository::new(database.pool());
    let original = run(1, RunStatus::Success);
    repository.store(&original).await.expect("store succeeds");

    let found = repository
        .find_by_id(original.id())
        .await
        .expect("lookup succeeds")
        .expect("run exists");

    let columns = found
        .data()
        .first()
        .map(|row| row.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    assert_eq!(columns, ["zeta", "alpha", "mid"]);
    assert_eq!(found.rows_affected(), Some(0));
    assert_eq!(found.rollback_query(), original.rollback_query());
    assert_eq!(found.execution_time_ms(), 42);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_run_is_rejected() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let repository = PostgresRunRepository::new(database.pool());
    let original = run(1, RunStatus::Success);
    repository.store(&original).await.expect("store succeeds");

    assert!(matches!(
        repository.store(&original).await,
        Err(RunRepositoryError::DuplicateRun(id)) if id == original.id()
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_status() {
    let Some(database) = prepared_database().await.expect("database setup") else {
        return;
    };
    let repository = PostgresRunRepository::new(database.pool());
    for (value, status) in [
        (1, RunStatus::Success),
        (2, RunStatus::Failure),
        (3, RunStatus::Success),
    ] {
        repository
            .store(&run(value, status))
            .await
            .expect("store succeeds");
    }

    let failures = repository
        .list(&PageRequest::default().with_search("fail"))
        .await
        .expect("listing succeeds");
    let all = repository
        .list(&PageRequest::new(1, 5))
        .await
        .expect("listing succeeds");

    assert_eq!(
        failures.iter().map(|found| found.id().to_string()).collect::<Vec<_>>(),
        ["RUN-000002"]
    );
    assert_eq!(all.len(), 2);
}
