//! In-memory integration tests for task CRUD operations.

use super::helpers::{TestService, service_over, store};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};
use taskkeeper::store::adapters::memory::InMemoryStore;
use taskkeeper::task::{
    domain::{TaskId, TaskStatus},
    services::{CreateTaskRequest, TaskErrorKind},
};

#[fixture]
fn service(store: InMemoryStore) -> TestService {
    service_over(&store)
}

fn id(value: u64) -> TaskId {
    TaskId::new(value).expect("valid id")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_is_pending_and_retrievable(service: TestService) {
    let clock = DefaultClock;
    let before = clock.utc();
    let created = service
        .create_task(CreateTaskRequest::new("Write report", "Quarterly numbers"))
        .await
        .expect("task creation should succeed");
    let after = clock.utc();

    let fetched = service
        .get_task(created.id())
        .await
        .expect("task should exist");

    assert_eq!(fetched, created);
    assert_eq!(fetched.status(), TaskStatus::Pending);
    assert_eq!(fetched.description().as_str(), "Quarterly numbers");
    assert!(fetched.created_at() >= before && fetched.created_at() <= after);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn surrounding_whitespace_survives_create_and_get(service: TestService) {
    let created = service
        .create_task(CreateTaskRequest::new("  Buy milk\n", "\t2% lowfat "))
        .await
        .expect("task creation should succeed");

    let fetched = service
        .get_task(created.id())
        .await
        .expect("task should exist");

    assert_eq!(fetched.title().as_str(), "  Buy milk\n");
    assert_eq!(fetched.description().as_str(), "\t2% lowfat ");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_mutable_field_can_be_updated(service: TestService) -> Result<(), eyre::Report> {
    let created = service
        .create_task(CreateTaskRequest::new("Draft", "First pass"))
        .await?;

    service
        .update_task_field(created.id(), "title", "Final")
        .await?;
    service
        .update_task_field(created.id(), "description", "Second pass")
        .await?;
    let updated = service
        .update_task_field(created.id(), "status", "Completed")
        .await?;

    eyre::ensure!(updated.title().as_str() == "Final", "title not updated");
    eyre::ensure!(
        updated.description().as_str() == "Second pass",
        "description not updated"
    );
    eyre::ensure!(
        updated.status() == TaskStatus::Completed,
        "status not updated"
    );
    eyre::ensure!(
        updated.created_at() == created.created_at(),
        "created_at must not change"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn delete_removes_the_task_and_its_listing_entry(service: TestService) {
    let keep = service
        .create_task(CreateTaskRequest::new("keep", "stays"))
        .await
        .expect("task creation should succeed");
    let drop = service
        .create_task(CreateTaskRequest::new("drop", "goes"))
        .await
        .expect("task creation should succeed");

    service
        .delete_task(drop.id())
        .await
        .expect("delete should succeed");

    let listing = service.list_tasks().await.expect("list should succeed");
    assert_eq!(listing.tasks(), std::slice::from_ref(&keep));
    let err = service
        .get_task(drop.id())
        .await
        .expect_err("deleted task is gone");
    assert_eq!(err.kind(), TaskErrorKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operations_on_unknown_ids_are_not_found(service: TestService) {
    let get = service.get_task(id(77)).await.expect_err("unknown id");
    let update = service
        .update_task_field(id(77), "title", "x")
        .await
        .expect_err("unknown id");
    let delete = service.delete_task(id(77)).await.expect_err("unknown id");

    assert_eq!(get.kind(), TaskErrorKind::NotFound);
    assert_eq!(update.kind(), TaskErrorKind::NotFound);
    assert_eq!(delete.kind(), TaskErrorKind::NotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_an_empty_store_is_clean(service: TestService) {
    let listing = service.list_tasks().await.expect("list should succeed");
    assert!(listing.tasks().is_empty());
    assert!(listing.is_clean());
}
