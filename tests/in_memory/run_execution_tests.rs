//! In-memory integration tests for run execution and recording.

use std::sync::Arc;
use std::time::Duration;

use super::helpers::{Stack, stack};
use rstest::rstest;
use sqlrun::config::RunSettings;
use sqlrun::environment::domain::Environment;
use sqlrun::listing::PageRequest;
use sqlrun::run::{
    adapters::scripted::ScriptedQueryExecutor,
    domain::{QueryOutcome, RunStatus},
    ports::{ExecutionReport, QueryExecutionError},
    services::{ExecuteRunRequest, RunServiceError},
};
use sqlrun::task::domain::TaskId;

fn request(task_id: TaskId, environment: &str) -> ExecuteRunRequest {
    ExecuteRunRequest::new(
        task_id,
        Environment::new(environment).expect("valid environment"),
        "bob",
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_configuration_fails_before_connecting(stack: Stack) {
    let task = stack
        .register_task("SELECT 1", "SELECT")
        .await
        .expect("task creation should succeed");
    stack
        .configure("dev", "dev-db.internal")
        .await
        .expect("configuration should succeed");

    let result = stack.runner.execute(request(task.id(), "staging")).await;

    assert!(matches!(
        result,
        Err(RunServiceError::ConfigurationNotFound { .. })
    ));
    assert!(stack.executor.calls().is_empty());
    assert!(stack.runs.snapshot().expect("snapshot").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn connection_failure_is_persisted(stack: Stack) {
    stack.executor.push_response(Err(QueryExecutionError::connection(
        "dev-db.internal:3306",
        std::io::Error::other("connection refused"),
    )));
    let task = stack
        .register_task("SELECT 1", "SELECT")
        .await
        .expect("task creation should succeed");
    stack
        .configure("dev", "dev-db.internal")
        .await
        .expect("configuration should succeed");

    let run = stack
        .runner
        .execute(request(task.id(), "dev"))
        .await
        .expect("failure runs are recorded");

    assert_eq!(run.status(), RunStatus::Failure);
    assert!(run.message().starts_with("Execution failed: could not connect to dev-db.internal:3306"));
    assert_eq!(
        stack.runner.get(run.id()).await.expect("run is stored"),
        run
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn configuration_changes_apply_to_the_next_run(stack: Stack) {
    let task = stack
        .register_task("SELECT 1", "SELECT")
        .await
        .expect("task creation should succeed");
    stack
        .configure("prod", "old-db.internal")
        .await
        .expect("configuration should succeed");
    stack
        .runner
        .execute(request(task.id(), "prod"))
        .await
        .expect("run should be recorded");

    stack
        .configure("prod", "new-db.internal")
        .await
        .expect("configuration should succeed");
    stack
        .runner
        .execute(request(task.id(), "prod"))
        .await
        .expect("run should be recorded");

    let hosts = stack
        .executor
        .calls()
        .into_iter()
        .map(|call| call.connection.host().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(hosts, ["old-db.internal", "new-db.internal"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn runs_are_searchable_by_environment(stack: Stack) {
    let task = stack
        .register_task("SELECT 1", "SELECT")
        .await
        .expect("task creation should succeed");
    for environment in ["dev", "prod", "dev"] {
        stack
            .configure(environment, "db.internal")
            .await
            .expect("configuration should succeed");
        stack
            .runner
            .execute(request(task.id(), environment))
            .await
            .expect("run should be recorded");
    }

    let prod = stack
        .runner
        .list(&PageRequest::default().with_search("prod"))
        .await
        .expect("listing should succeed");

    assert_eq!(prod.len(), 1);
    assert_eq!(
        prod.first().map(|run| run.id().to_string()).as_deref(),
        Some("RUN-000002")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_delete_leaves_no_rollback() {
    let executor = ScriptedQueryExecutor::new();
    executor.push_response(Ok(ExecutionReport::new(QueryOutcome::affected(0))
        .with_pre_image(Err(QueryExecutionError::statement(std::io::Error::other(
            "SELECT command denied",
        ))))));
    let stack = Stack::new(executor, RunSettings::default());
    let task = stack
        .register_task("DELETE FROM carts WHERE id = 4", "DELETE")
        .await
        .expect("task creation should succeed");
    stack
        .configure("dev", "db.internal")
        .await
        .expect("configuration should succeed");

    let run = stack
        .runner
        .execute(request(task.id(), "dev"))
        .await
        .expect("run should be recorded");

    let calls = stack.executor.calls();
    let capture = calls
        .first()
        .and_then(|call| call.plan.pre_image())
        .map(|query| query.sql().to_owned());
    assert_eq!(
        capture.as_deref(),
        Some("SELECT * FROM carts WHERE id = 4 LIMIT 1001")
    );
    assert_eq!(run.status(), RunStatus::Success);
    assert_eq!(run.rollback_query(), None);
}

#[tokio::test(start_paused = true)]
async fn abandoned_run_still_records_its_outcome() {
    let executor = ScriptedQueryExecutor::new().with_delay(Duration::from_secs(2));
    let stack = Stack::new(executor, RunSettings::default());
    let task = stack
        .register_task("UPDATE carts SET state = 'closed' WHERE id = 9", "UPDATE")
        .await
        .expect("task creation should succeed");
    stack
        .configure("dev", "db.internal")
        .await
        .expect("configuration should succeed");
    let runner = Arc::new(stack.runner);

    let caller = tokio::spawn({
        let service = Arc::clone(&runner);
        let run_request = request(task.id(), "dev");
        async move { service.execute(run_request).await }
    });
    tokio::time::sleep(Duration::from_millis(500)).await;
    caller.abort();
    assert!(caller.await.is_err_and(|err| err.is_cancelled()));

    tokio::time::sleep(Duration::from_secs(5)).await;

    let runs = stack.runs.snapshot().expect("snapshot");
    assert_eq!(runs.len(), 1);
    assert_eq!(
        runs.first().map(|run| run.status()),
        Some(RunStatus::Success)
    );
}
