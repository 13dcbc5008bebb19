//! Result of a full task listing.

use super::Task;
use serde::Serialize;

/// A stored record that could not be turned into a task during a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingWarning {
    /// Storage key of the skipped record.
    pub key: String,
    /// Why the record was skipped.
    pub reason: String,
}

impl ListingWarning {
    /// Creates a warning for the given key.
    #[must_use]
    pub fn new(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Tasks retrieved by a listing together with the records that were skipped.
///
/// One corrupt record never fails the whole listing; it is reported as a
/// [`ListingWarning`] next to the tasks that decoded cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskListing {
    tasks: Vec<Task>,
    warnings: Vec<ListingWarning>,
}

impl TaskListing {
    /// Creates a listing from its parts.
    #[must_use]
    pub const fn new(tasks: Vec<Task>, warnings: Vec<ListingWarning>) -> Self {
        Self { tasks, warnings }
    }

    /// Returns the tasks that decoded cleanly.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns warnings for skipped records.
    #[must_use]
    pub fn warnings(&self) -> &[ListingWarning] {
        &self.warnings
    }

    /// Returns `true` when no record was skipped.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Orders tasks by identifier and warnings by key.
    pub fn sort_by_id(&mut self) {
        self.tasks.sort_by_key(Task::id);
        self.warnings.sort_by(|a, b| a.key.cmp(&b.key));
    }

    /// Splits the listing into tasks and warnings.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Task>, Vec<ListingWarning>) {
        (self.tasks, self.warnings)
    }

    pub(crate) fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub(crate) fn push_warning(&mut self, warning: ListingWarning) {
        self.warnings.push(warning);
    }
}
