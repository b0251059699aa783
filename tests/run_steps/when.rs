//! When steps for run execution BDD scenarios.

use super::world::{RunWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use sqlrun::environment::domain::Environment;
use sqlrun::run::services::ExecuteRunRequest;

#[when(r#"the task is run against "{environment}" by "{requested_by}""#)]
fn run_task(
    world: &mut RunWorld,
    environment: String,
    requested_by: String,
) -> Result<(), eyre::Report> {
    let task_id = world
        .task
        .as_ref()
        .map(sqlrun::task::domain::Task::id)
        .ok_or_else(|| eyre::eyre!("missing task in scenario world"))?;
    let tag = Environment::new(&environment).wrap_err("parse environment tag")?;
    let request = ExecuteRunRequest::new(task_id, tag, requested_by);
    world.last_run_result = Some(run_async(world.runner.execute(request)));
    Ok(())
}
