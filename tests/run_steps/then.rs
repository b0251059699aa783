//! Then steps for run execution BDD scenarios.

use super::world::RunWorld;
use rstest_bdd_macros::then;
use sqlrun::run::{domain::Run, services::RunServiceError};

fn last_run(world: &RunWorld) -> Result<&Run, eyre::Report> {
    world
        .last_run_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing run result in scenario world"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("unexpected run failure: {err}"))
}

#[then(r#"a run with status "{status}" is recorded"#)]
fn run_recorded_with_status(world: &RunWorld, status: String) -> Result<(), eyre::Report> {
    let run = last_run(world)?;
    if run.status().as_str() != status {
        return Err(eyre::eyre!(
            "expected status {status}, found {}",
            run.status()
        ));
    }
    let stored = world
        .runs
        .snapshot()
        .map_err(|err| eyre::eyre!("snapshot failed: {err}"))?;
    if stored.as_slice() != std::slice::from_ref(run) {
        return Err(eyre::eyre!("expected exactly the returned run to be stored"));
    }
    Ok(())
}

#[then(r#"the run message is "{message}""#)]
fn run_message_is(world: &RunWorld, message: String) -> Result<(), eyre::Report> {
    let run = last_run(world)?;
    eyre::ensure!(
        run.message() == message,
        "expected message {message:?}, found {:?}",
        run.message()
    );
    Ok(())
}

#[then(r#"the rollback script is "{rollback}""#)]
fn rollback_script_is(world: &RunWorld, rollback: String) -> Result<(), eyre::Report> {
    let run = last_run(world)?;
    eyre::ensure!(
        run.rollback_query() == Some(rollback.as_str()),
        "expected rollback {rollback:?}, found {:?}",
        run.rollback_query()
    );
    Ok(())
}

#[then("the run is rejected for missing configuration")]
fn run_rejected_for_missing_configuration(world: &RunWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_run_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing run result in scenario world"))?;
    eyre::ensure!(
        matches!(result, Err(RunServiceError::ConfigurationNotFound { .. })),
        "expected a missing configuration error, found {result:?}"
    );
    eyre::ensure!(
        world.executor.calls().is_empty(),
        "no connection should have been attempted"
    );
    Ok(())
}

#[then("no run is recorded")]
fn no_run_recorded(world: &RunWorld) -> Result<(), eyre::Report> {
    let stored = world
        .runs
        .snapshot()
        .map_err(|err| eyre::eyre!("snapshot failed: {err}"))?;
    eyre::ensure!(stored.is_empty(), "expected no runs, found {}", stored.len());
    Ok(())
}
