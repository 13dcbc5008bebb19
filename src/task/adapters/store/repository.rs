//! Task repository backed by a [`KeyValueStore`].

use super::record::{
    self, TASK_ID_COUNTER_KEY, TASK_KEY_PREFIX, decode, encode, encode_update, task_key,
};
use crate::store::ports::{KeyValueStore, StoreError};
use crate::task::{
    domain::{ListingWarning, NewTask, Task, TaskFieldUpdate, TaskId, TaskListing},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use futures::StreamExt;
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// The id counter produced a value that cannot name a task.
#[derive(Debug, Error)]
#[error("task id counter produced non-positive value {0}")]
struct CounterOutOfRange(i64);

/// Task repository storing each task as one composite record.
///
/// Identifiers come from an atomic counter in the store, so concurrent
/// creates from any number of processes never collide.
#[derive(Debug, Clone)]
pub struct KeyValueTaskRepository<S, C>
where
    S: KeyValueStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> KeyValueTaskRepository<S, C>
where
    S: KeyValueStore,
    C: Clock + Send + Sync,
{
    /// Creates a repository over the given store.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    async fn allocate_id(&self) -> TaskRepositoryResult<TaskId> {
        let raw = self
            .store
            .increment(TASK_ID_COUNTER_KEY)
            .await
            .map_err(|err| map_store_error(TASK_ID_COUNTER_KEY, err))?;
        u64::try_from(raw)
            .ok()
            .and_then(|value| TaskId::new(value).ok())
            .ok_or_else(|| TaskRepositoryError::unexpected(CounterOutOfRange(raw)))
    }

    async fn ensure_exists(&self, id: TaskId) -> TaskRepositoryResult<String> {
        let key = task_key(id);
        let found = self
            .store
            .exists(&key)
            .await
            .map_err(|err| map_store_error(&key, err))?;
        if found {
            Ok(key)
        } else {
            Err(TaskRepositoryError::NotFound(id))
        }
    }

    async fn collect_record(
        &self,
        key: String,
        listing: &mut TaskListing,
    ) -> TaskRepositoryResult<()> {
        if let Err(err) = record::parse_task_key(&key) {
            tracing::warn!("Skipping task record '{}': {}", key, err);
            listing.push_warning(ListingWarning::new(key, err.to_string()));
            return Ok(());
        }

        let fields = match self.store.get_fields(&key).await {
            Ok(fields) => fields,
            Err(err) if err.is_corruption() => {
                tracing::warn!("Skipping task record '{}': {}", key, err);
                listing.push_warning(ListingWarning::new(key, err.to_string()));
                return Ok(());
            }
            Err(err) => return Err(map_store_error(&key, err)),
        };

        // Deleted between the scan and the read.
        if fields.is_empty() {
            tracing::debug!("Task record '{}' vanished during listing", key);
            return Ok(());
        }

        match decode(&key, &fields) {
            Ok(task) => listing.push_task(task),
            Err(err) => {
                tracing::warn!("Skipping task record '{}': {}", key, err);
                listing.push_warning(ListingWarning::new(key, err.to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<S, C> TaskRepository for KeyValueTaskRepository<S, C>
where
    S: KeyValueStore,
    C: Clock + Send + Sync,
{
    #[tracing::instrument(level = "debug", skip(self, draft))]
    async fn create(&self, draft: NewTask) -> TaskRepositoryResult<Task> {
        let id = self.allocate_id().await?;
        let task = Task::create(id, draft, &*self.clock);
        let key = task_key(id);

        if let Err(err) = self.store.set_fields(&key, &encode(&task)).await {
            tracing::warn!(
                "Task id {} was allocated but its record could not be written: {}",
                id,
                err
            );
            return Err(map_store_error(&key, err));
        }

        tracing::info!("Created task {}", id);
        Ok(task)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn list(&self) -> TaskRepositoryResult<TaskListing> {
        self.store
            .ping()
            .await
            .map_err(|err| map_store_error(TASK_KEY_PREFIX, err))?;

        let mut keys = self.store.scan_keys(TASK_KEY_PREFIX);
        let mut seen = HashSet::new();
        let mut listing = TaskListing::default();

        while let Some(next) = keys.next().await {
            let key = match next {
                Ok(key) => key,
                Err(StoreError::Decode { key }) => {
                    tracing::warn!("Skipping undecodable task key '{}'", key);
                    listing.push_warning(ListingWarning::new(key, "key is not valid UTF-8 text"));
                    continue;
                }
                Err(err) => return Err(map_store_error(TASK_KEY_PREFIX, err)),
            };
            if !seen.insert(key.clone()) {
                continue;
            }
            self.collect_record(key, &mut listing).await?;
        }

        tracing::debug!(
            "Listed {} tasks with {} warnings",
            listing.tasks().len(),
            listing.warnings().len()
        );
        Ok(listing)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Task> {
        let key = task_key(id);
        let fields = self
            .store
            .get_fields(&key)
            .await
            .map_err(|err| map_store_error(&key, err))?;
        if fields.is_empty() {
            return Err(TaskRepositoryError::NotFound(id));
        }
        decode(&key, &fields).map_err(|err| TaskRepositoryError::corrupt(key, err))
    }

    async fn exists(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let key = task_key(id);
        self.store
            .exists(&key)
            .await
            .map_err(|err| map_store_error(&key, err))
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn update_field(
        &self,
        id: TaskId,
        update: TaskFieldUpdate,
    ) -> TaskRepositoryResult<Task> {
        let key = self.ensure_exists(id).await?;
        self.store
            .set_fields(&key, &encode_update(&update))
            .await
            .map_err(|err| map_store_error(&key, err))?;

        tracing::info!("Updated field '{}' of task {}", update.field(), id);
        self.find_by_id(id).await
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let key = self.ensure_exists(id).await?;
        let removed = self
            .store
            .delete(&key)
            .await
            .map_err(|err| map_store_error(&key, err))?;
        if !removed {
            return Err(TaskRepositoryError::NotFound(id));
        }

        tracing::info!("Deleted task {}", id);
        Ok(())
    }

    async fn health_check(&self) -> TaskRepositoryResult<()> {
        self.store
            .ping()
            .await
            .map_err(|err| map_store_error(TASK_KEY_PREFIX, err))
    }
}

fn map_store_error(key: &str, err: StoreError) -> TaskRepositoryError {
    if err.is_unavailable() {
        TaskRepositoryError::storage_unavailable(err)
    } else if err.is_corruption() {
        TaskRepositoryError::corrupt(key, err)
    } else {
        TaskRepositoryError::unexpected(err)
    }
}
