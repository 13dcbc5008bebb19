//! Shared world state for task tracking BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskkeeper::store::adapters::memory::InMemoryStore;
use taskkeeper::task::{
    adapters::store::KeyValueTaskRepository,
    domain::{Task, TaskId, TaskListing},
    services::{TaskErrorKind, TaskServiceError, TaskTrackerService},
};

/// Service type used by the BDD world.
pub type TestTaskService = TaskTrackerService<KeyValueTaskRepository<InMemoryStore, DefaultClock>>;

/// Scenario world for task tracking behaviour tests.
pub struct TaskCrudWorld {
    pub store: InMemoryStore,
    pub service: TestTaskService,
    pub last_created_task: Option<Task>,
    pub last_listing: Option<TaskListing>,
    pub last_error: Option<TaskServiceError>,
}

impl TaskCrudWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let service = TaskTrackerService::new(Arc::new(KeyValueTaskRepository::new(
            Arc::new(store.clone()),
            Arc::new(DefaultClock),
        )));

        Self {
            store,
            service,
            last_created_task: None,
            last_listing: None,
            last_error: None,
        }
    }

    /// Records the outcome of an operation whose value is not kept.
    pub fn record<T>(&mut self, result: Result<T, TaskServiceError>) {
        self.last_error = result.err();
    }
}

impl Default for TaskCrudWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskCrudWorld {
    TaskCrudWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a task id written in a step.
///
/// # Errors
///
/// Returns an error when the value is not a positive integer.
pub fn task_id(value: u64) -> Result<TaskId, eyre::Report> {
    TaskId::new(value).map_err(|err| eyre::eyre!("invalid task id in scenario: {err}"))
}

/// Maps the error names used in feature files to error kinds.
///
/// # Errors
///
/// Returns an error for names the scenarios do not use.
pub fn error_kind(name: &str) -> Result<TaskErrorKind, eyre::Report> {
    match name {
        "validation" => Ok(TaskErrorKind::Validation),
        "not found" => Ok(TaskErrorKind::NotFound),
        "corrupt record" => Ok(TaskErrorKind::CorruptRecord),
        "storage unavailable" => Ok(TaskErrorKind::StorageUnavailable),
        "unexpected" => Ok(TaskErrorKind::Unexpected),
        other => Err(eyre::eyre!("unknown error kind in scenario: {other}")),
    }
}
