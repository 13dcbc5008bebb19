//! Mapping between tasks and composite store records.
//!
//! Each task is one record at `task:<id>` with the sub-fields `id`, `title`,
//! `description`, `status` and `created_at`. The `id` field duplicates the
//! key suffix and is cross-checked on every read.

use crate::store::ports::FieldMap;
use crate::task::domain::{
    ParseTaskStatusError, PersistedTaskData, Task, TaskDescription, TaskField, TaskFieldUpdate,
    TaskId, TaskStatus, TaskTitle,
};
use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Key prefix shared by every task record.
pub const TASK_KEY_PREFIX: &str = "task:";

/// Counter key used to allocate task identifiers.
///
/// Lives outside the [`TASK_KEY_PREFIX`] namespace so scans never see it.
pub const TASK_ID_COUNTER_KEY: &str = "task_id_counter";

const ID_FIELD: &str = "id";
const CREATED_AT_FIELD: &str = "created_at";

/// Reasons a stored record cannot be decoded into a task.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The key does not have the form `task:<positive integer>`.
    #[error("key does not name a task record")]
    MalformedKey,

    /// A required sub-field is absent.
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    /// A text sub-field is blank.
    #[error("field '{0}' is empty")]
    EmptyField(&'static str),

    /// The stored `id` disagrees with the key.
    #[error("stored id '{stored}' does not match key id {expected}")]
    IdMismatch {
        /// Identifier taken from the key.
        expected: TaskId,
        /// Raw stored identifier.
        stored: String,
    },

    /// The stored status is not a member of the enumeration.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The stored creation timestamp cannot be parsed.
    #[error("unparseable created_at '{0}'")]
    InvalidTimestamp(String),
}

/// Returns the storage key of a task.
#[must_use]
pub fn task_key(id: TaskId) -> String {
    format!("{TASK_KEY_PREFIX}{id}")
}

/// Extracts the task identifier from a storage key.
///
/// # Errors
///
/// Returns [`RecordError::MalformedKey`] when the key is outside the task
/// namespace or its suffix is not a positive integer.
pub fn parse_task_key(key: &str) -> Result<TaskId, RecordError> {
    let suffix = key
        .strip_prefix(TASK_KEY_PREFIX)
        .ok_or(RecordError::MalformedKey)?;
    if suffix.is_empty() || !suffix.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(RecordError::MalformedKey);
    }
    suffix
        .parse::<TaskId>()
        .map_err(|_| RecordError::MalformedKey)
}

/// Encodes every field of a task.
#[must_use]
pub fn encode(task: &Task) -> FieldMap {
    FieldMap::from([
        (ID_FIELD.to_owned(), task.id().to_string()),
        (
            TaskField::Title.as_str().to_owned(),
            task.title().as_str().to_owned(),
        ),
        (
            TaskField::Description.as_str().to_owned(),
            task.description().as_str().to_owned(),
        ),
        (
            TaskField::Status.as_str().to_owned(),
            task.status().as_str().to_owned(),
        ),
        (
            CREATED_AT_FIELD.to_owned(),
            task.created_at().to_rfc3339_opts(SecondsFormat::AutoSi, true),
        ),
    ])
}

/// Encodes the single field touched by an update.
#[must_use]
pub fn encode_update(update: &TaskFieldUpdate) -> FieldMap {
    FieldMap::from([(
        update.field().as_str().to_owned(),
        update.value().to_owned(),
    )])
}

/// Decodes a stored record into a task.
///
/// # Errors
///
/// Returns a [`RecordError`] describing the first defect found.
pub fn decode(key: &str, fields: &FieldMap) -> Result<Task, RecordError> {
    let id = parse_task_key(key)?;

    let stored_id = require(fields, ID_FIELD)?;
    if stored_id.trim().parse::<TaskId>().ok() != Some(id) {
        return Err(RecordError::IdMismatch {
            expected: id,
            stored: stored_id.to_owned(),
        });
    }

    let title_field = TaskField::Title.as_str();
    let title = TaskTitle::new(require(fields, title_field)?)
        .map_err(|_| RecordError::EmptyField(title_field))?;

    let description_field = TaskField::Description.as_str();
    let description = TaskDescription::new(require(fields, description_field)?)
        .map_err(|_| RecordError::EmptyField(description_field))?;

    let status = TaskStatus::try_from(require(fields, TaskField::Status.as_str())?)?;
    let created_at = decode_timestamp(require(fields, CREATED_AT_FIELD)?)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id,
        title,
        description,
        status,
        created_at,
    }))
}

fn require<'a>(fields: &'a FieldMap, name: &'static str) -> Result<&'a str, RecordError> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or(RecordError::MissingField(name))
}

/// Timestamps must carry an offset; a naive value has no single instant.
fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, RecordError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| RecordError::InvalidTimestamp(raw.to_owned()))
}
