//! Key-value store adapter for task persistence.

pub(crate) mod record;
mod repository;

pub use record::{TASK_ID_COUNTER_KEY, TASK_KEY_PREFIX, task_key};
pub use repository::KeyValueTaskRepository;
