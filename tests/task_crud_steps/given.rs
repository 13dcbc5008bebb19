//! Given steps for task tracking BDD scenarios.

use super::world::{TaskCrudWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskkeeper::store::ports::{FieldMap, KeyValueStore};
use taskkeeper::task::services::CreateTaskRequest;

#[given("an empty task store")]
fn empty_task_store(world: &mut TaskCrudWorld) -> Result<(), eyre::Report> {
    let listing = run_async(world.service.list_tasks()).wrap_err("list fresh store")?;
    eyre::ensure!(listing.tasks().is_empty(), "store is not empty");
    Ok(())
}

#[given(r#"a task titled "{title}" described as "{description}" exists"#)]
fn task_exists(
    world: &mut TaskCrudWorld,
    title: String,
    description: String,
) -> Result<(), eyre::Report> {
    let created = run_async(
        world
            .service
            .create_task(CreateTaskRequest::new(title, description)),
    )
    .wrap_err("create task for scenario setup")?;
    world.last_created_task = Some(created);
    Ok(())
}

#[given(r#"a stored record "{key}" without a description"#)]
fn stored_record_without_description(
    world: &mut TaskCrudWorld,
    key: String,
) -> Result<(), eyre::Report> {
    let id = key
        .strip_prefix("task:")
        .ok_or_else(|| eyre::eyre!("scenario key must start with task:"))?;
    let fields: FieldMap = [
        ("id", id),
        ("title", "orphan"),
        ("status", "pending"),
        ("created_at", "2024-01-01T00:00:00Z"),
    ]
    .into_iter()
    .map(|(field, value)| (field.to_owned(), value.to_owned()))
    .collect();
    run_async(world.store.set_fields(&key, &fields)).wrap_err("seed corrupt record")?;
    Ok(())
}

#[given("the store is unreachable")]
fn store_is_unreachable(world: &mut TaskCrudWorld) {
    world.store.set_reachable(false);
}
