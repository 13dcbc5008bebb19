//! Then steps for task tracking BDD scenarios.

use super::world::{TaskCrudWorld, error_kind, run_async, task_id};
use rstest_bdd_macros::then;
use taskkeeper::task::domain::TaskStatus;

#[then(r#"the created task has id {id:u64} and status "{status}""#)]
fn created_task_matches(
    world: &TaskCrudWorld,
    id: u64,
    status: String,
) -> Result<(), eyre::Report> {
    let expected_status = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world
        .last_created_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing created task"))?;

    eyre::ensure!(
        task.id() == task_id(id)?,
        "expected id {id}, found {}",
        task.id()
    );
    eyre::ensure!(
        task.status() == expected_status,
        "expected status {expected_status}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"task {id:u64} has status "{status}""#)]
fn task_has_status(world: &TaskCrudWorld, id: u64, status: String) -> Result<(), eyre::Report> {
    let expected_status = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = run_async(world.service.get_task(task_id(id)?))
        .map_err(|err| eyre::eyre!("task {id} should be readable: {err}"))?;

    eyre::ensure!(
        task.status() == expected_status,
        "expected status {expected_status}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the last operation fails with "{kind}""#)]
fn last_operation_fails_with(world: &TaskCrudWorld, kind: String) -> Result<(), eyre::Report> {
    let expected = error_kind(&kind)?;
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the last operation to fail"))?;

    eyre::ensure!(
        err.kind() == expected,
        "expected {expected:?} error, got {err:?}"
    );
    Ok(())
}

#[then("the listing contains {count:usize} task")]
fn listing_contains(world: &TaskCrudWorld, count: usize) -> Result<(), eyre::Report> {
    let listing = world
        .last_listing
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing listing"))?;

    eyre::ensure!(
        listing.tasks().len() == count,
        "expected {count} tasks, found {}",
        listing.tasks().len()
    );
    Ok(())
}

#[then(r#"the listing warns about "{key}""#)]
fn listing_warns_about(world: &TaskCrudWorld, key: String) -> Result<(), eyre::Report> {
    let listing = world
        .last_listing
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing listing"))?;

    eyre::ensure!(
        listing.warnings().iter().any(|warning| warning.key == key),
        "no warning for {key}, got {:?}",
        listing.warnings()
    );
    Ok(())
}
