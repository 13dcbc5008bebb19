//! When steps for task tracking BDD scenarios.

use super::world::{TaskCrudWorld, run_async, task_id};
use rstest_bdd_macros::when;
use taskkeeper::task::services::CreateTaskRequest;

#[when(r#"a task titled "{title}" described as "{description}" is created"#)]
fn create_task(world: &mut TaskCrudWorld, title: String, description: String) {
    let result = run_async(
        world
            .service
            .create_task(CreateTaskRequest::new(title, description)),
    );
    match result {
        Ok(task) => {
            world.last_created_task = Some(task);
            world.last_error = None;
        }
        Err(err) => world.last_error = Some(err),
    }
}

#[when(r#"field "{field}" of task {id:u64} is set to "{value}""#)]
fn update_field(
    world: &mut TaskCrudWorld,
    field: String,
    id: u64,
    value: String,
) -> Result<(), eyre::Report> {
    let result = run_async(world.service.update_task_field(task_id(id)?, &field, &value));
    world.record(result);
    Ok(())
}

#[when("task {id:u64} is deleted")]
fn delete_task(world: &mut TaskCrudWorld, id: u64) -> Result<(), eyre::Report> {
    let result = run_async(world.service.delete_task(task_id(id)?));
    world.record(result);
    Ok(())
}

#[when("task {id:u64} is fetched")]
fn fetch_task(world: &mut TaskCrudWorld, id: u64) -> Result<(), eyre::Report> {
    let result = run_async(world.service.get_task(task_id(id)?));
    world.record(result);
    Ok(())
}

#[when("the tasks are listed")]
fn list_tasks(world: &mut TaskCrudWorld) {
    match run_async(world.service.list_tasks()) {
        Ok(listing) => {
            world.last_listing = Some(listing);
            world.last_error = None;
        }
        Err(err) => world.last_error = Some(err),
    }
}
