//! Domain model for task tracking.
//!
//! Tasks carry a title, a description, a status from a closed enumeration,
//! and an immutable creation timestamp. Validation lives here so invalid
//! values are rejected before any storage is touched.

mod error;
mod field;
mod ids;
mod listing;
mod status;
mod task;
mod text;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use field::{TaskField, TaskFieldUpdate};
pub use ids::TaskId;
pub use listing::{ListingWarning, TaskListing};
pub use status::TaskStatus;
pub use task::{NewTask, PersistedTaskData, Task};
pub use text::{TaskDescription, TaskTitle};
