//! Todo item domain model.
//!
//! # Responsibility
//! - Define the canonical todo record shown as one row in the list.
//! - Provide the caller-side title check used before writes.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `adding_time` is set once at construction and never mutated.
//! - Stored items always have a non-empty `title`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable primary key of a todo item.
pub type TodoItemId = Uuid;

/// Validation failures for todo item construction and input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoItemValidationError {
    /// The nil UUID cannot identify a record.
    NilId,
    /// Titles must contain at least one character.
    EmptyTitle,
}

impl Display for TodoItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "todo item id must not be nil"),
            Self::EmptyTitle => write!(f, "todo item title must not be empty"),
        }
    }
}

impl Error for TodoItemValidationError {}

/// One todo list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoItemId,
    pub title: String,
    /// Secondary row text. Empty when the user left it blank.
    pub subtitle: String,
    /// Unix epoch milliseconds.
    pub adding_time: i64,
}

impl TodoItem {
    /// Creates a new item with a generated id and the current timestamp.
    ///
    /// Does not check `title`; callers run [`validate_title`] first.
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            subtitle: subtitle.into(),
            adding_time: now_epoch_ms(),
        }
    }

    /// Rebuilds an item whose identity and timestamp already exist.
    ///
    /// # Errors
    /// - Returns `NilId` when `id` is the nil UUID.
    pub fn with_id(
        id: TodoItemId,
        title: impl Into<String>,
        subtitle: impl Into<String>,
        adding_time: i64,
    ) -> Result<Self, TodoItemValidationError> {
        if id.is_nil() {
            return Err(TodoItemValidationError::NilId);
        }
        Ok(Self {
            id,
            title: title.into(),
            subtitle: subtitle.into(),
            adding_time,
        })
    }

    /// Checks the invariants every stored item must satisfy.
    pub fn validate(&self) -> Result<(), TodoItemValidationError> {
        if self.id.is_nil() {
            return Err(TodoItemValidationError::NilId);
        }
        validate_title(&self.title)
    }
}

/// Rejects empty titles before they reach the store.
pub fn validate_title(title: &str) -> Result<(), TodoItemValidationError> {
    if title.is_empty() {
        return Err(TodoItemValidationError::EmptyTitle);
    }
    Ok(())
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
