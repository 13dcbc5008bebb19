//! Corrupt records and store outages seen through the service.

use super::helpers::{seed_record, service_over, store};
use rstest::rstest;
use taskkeeper::store::{adapters::memory::InMemoryStore, ports::KeyValueStore};
use taskkeeper::task::{
    domain::TaskId,
    services::{CreateTaskRequest, TaskErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_reports_corrupt_records_next_to_valid_tasks(
    store: InMemoryStore,
) -> Result<(), eyre::Report> {
    let service = service_over(&store);
    let valid = service
        .create_task(CreateTaskRequest::new("A", "valid"))
        .await?;
    seed_record(
        &store,
        "task:900",
        &[("id", "900"), ("description", "no title"), ("status", "pending")],
    )
    .await?;

    let listing = service.list_tasks().await?;

    eyre::ensure!(
        listing.tasks() == std::slice::from_ref(&valid),
        "expected only the valid task, got {:?}",
        listing.tasks()
    );
    let warning = listing
        .warnings()
        .first()
        .ok_or_else(|| eyre::eyre!("expected a warning for the corrupt record"))?;
    eyre::ensure!(warning.key == "task:900", "unexpected key {}", warning.key);
    eyre::ensure!(
        listing.warnings().len() == 1,
        "expected exactly one warning"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reading_a_corrupt_record_is_not_a_missing_record(
    store: InMemoryStore,
) -> Result<(), eyre::Report> {
    let service = service_over(&store);
    seed_record(
        &store,
        "task:5",
        &[
            ("id", "5"),
            ("title", "t"),
            ("description", "d"),
            ("status", "archived"),
            ("created_at", "2024-01-01T00:00:00Z"),
        ],
    )
    .await?;

    let err = service
        .get_task(TaskId::new(5)?)
        .await
        .err()
        .ok_or_else(|| eyre::eyre!("corrupt record must not decode"))?;

    eyre::ensure!(
        err.kind() == TaskErrorKind::CorruptRecord,
        "expected CorruptRecord, got {err:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn records_written_without_offsets_read_as_corrupt(
    store: InMemoryStore,
) -> Result<(), eyre::Report> {
    let service = service_over(&store);
    seed_record(
        &store,
        "task:3",
        &[
            ("id", "3"),
            ("title", "Buy milk"),
            ("description", "2% lowfat"),
            ("status", "In Progress"),
            ("created_at", "2023-11-05 08:30:00"),
        ],
    )
    .await?;

    let Err(err) = service.get_task(TaskId::new(3)?).await else {
        eyre::bail!("naive timestamp must not decode");
    };

    eyre::ensure!(
        err.kind() == TaskErrorKind::CorruptRecord,
        "expected CorruptRecord, got {err:?}"
    );
    eyre::ensure!(
        err.to_string().contains("2023-11-05 08:30:00"),
        "error does not name the timestamp: {err}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outage_fails_fast_and_recovery_needs_no_restart(store: InMemoryStore) {
    let service = service_over(&store);
    let created = service
        .create_task(CreateTaskRequest::new("before", "outage"))
        .await
        .expect("task creation should succeed");

    store.set_reachable(false);
    for err in [
        service.list_tasks().await.err(),
        service.get_task(created.id()).await.err(),
        service
            .create_task(CreateTaskRequest::new("during", "outage"))
            .await
            .err(),
        service.delete_task(created.id()).await.err(),
    ] {
        let kind = err.map(|failure| failure.kind());
        assert_eq!(kind, Some(TaskErrorKind::StorageUnavailable));
    }

    store.set_reachable(true);
    let fetched = service
        .get_task(created.id())
        .await
        .expect("task survives the outage");
    assert_eq!(fetched, created);
    assert!(store.exists("task:1").await.expect("exists succeeds"));
}
