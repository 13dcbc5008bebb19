//! Application services exposing task tracking to collaborators.

mod tracker;

pub use tracker::{
    CreateTaskRequest, TaskErrorKind, TaskServiceError, TaskServiceResult, TaskTrackerService,
};
