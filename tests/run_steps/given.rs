//! Given steps for run execution BDD scenarios.

use super::world::{RunWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;
use sqlrun::environment::domain::ConnectionParams;
use sqlrun::run::{
    domain::{QueryOutcome, RowMap},
    ports::{ExecutionReport, QueryExecutionError},
};
use sqlrun::task::services::CreateTaskRequest;

#[given(r#"a "{query_type}" task "{sql}" on database "{db_name}""#)]
fn registered_task(
    world: &mut RunWorld,
    query_type: String,
    sql: String,
    db_name: String,
) -> Result<(), eyre::Report> {
    let task = run_async(world.tasks.create(CreateTaskRequest::new(
        "Scenario task",
        db_name,
        sql,
        query_type,
        "alice",
    )))
    .wrap_err("register scenario task")?;
    world.task = Some(task);
    Ok(())
}

#[given(r#"database "{db_name}" is configured for environment "{environment}""#)]
fn configured_database(
    world: &mut RunWorld,
    db_name: String,
    environment: String,
) -> Result<(), eyre::Report> {
    let connection = ConnectionParams::new(
        &format!("{db_name}.internal"),
        3306,
        &db_name,
        "svc",
        "secret",
    )
    .wrap_err("build connection settings")?;
    run_async(world.environments.upsert(&db_name, &environment, connection))
        .wrap_err("store connection settings")?;
    Ok(())
}

#[given("the target returns {count:u64} rows")]
fn target_returns_rows(world: &mut RunWorld, count: u64) {
    let rows = (1..=count)
        .map(|id| {
            let mut row = RowMap::new();
            row.insert("id".to_owned(), json!(id));
            row
        })
        .collect();
    world
        .executor
        .push_response(Ok(ExecutionReport::new(QueryOutcome::new(rows, 0, false))));
}

#[given("the target refuses connections")]
fn target_refuses_connections(world: &mut RunWorld) {
    world
        .executor
        .push_response(Err(QueryExecutionError::connection(
            "shop.internal:3306",
            std::io::Error::other("connection refused"),
        )));
}
