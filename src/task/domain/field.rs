//! Mutable task fields and validated single-field updates.

use super::{TaskDescription, TaskDomainError, TaskStatus, TaskTitle};
use std::fmt;

/// Task fields that may change after creation.
///
/// The identifier and creation timestamp are deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    /// The task title.
    Title,
    /// The task description.
    Description,
    /// The task status.
    Status,
}

impl TaskField {
    /// Every mutable field.
    pub const ALL: [Self; 3] = [Self::Title, Self::Description, Self::Status];

    /// Returns the canonical field name, which is also its storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
        }
    }
}

impl TryFrom<&str> for TaskField {
    type Error = TaskDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "status" => Ok(Self::Status),
            _ => Err(TaskDomainError::UnsupportedField(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated new value for exactly one mutable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskFieldUpdate {
    /// Replace the title.
    Title(TaskTitle),
    /// Replace the description.
    Description(TaskDescription),
    /// Replace the status.
    Status(TaskStatus),
}

impl TaskFieldUpdate {
    /// Validates a raw field name and value pair.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::UnsupportedField`] for immutable or unknown
    /// fields, [`TaskDomainError::InvalidStatus`] for values outside the
    /// status enumeration, and the empty-text errors for blank titles or
    /// descriptions.
    pub fn parse(field: &str, value: &str) -> Result<Self, TaskDomainError> {
        match TaskField::try_from(field)? {
            TaskField::Title => Ok(Self::Title(TaskTitle::new(value)?)),
            TaskField::Description => Ok(Self::Description(TaskDescription::new(value)?)),
            TaskField::Status => Ok(Self::Status(TaskStatus::try_from(value)?)),
        }
    }

    /// Returns the field this update targets.
    #[must_use]
    pub const fn field(&self) -> TaskField {
        match self {
            Self::Title(_) => TaskField::Title,
            Self::Description(_) => TaskField::Description,
            Self::Status(_) => TaskField::Status,
        }
    }

    /// Returns the new value in its canonical storage form.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Title(title) => title.as_str(),
            Self::Description(description) => description.as_str(),
            Self::Status(status) => status.as_str(),
        }
    }
}
