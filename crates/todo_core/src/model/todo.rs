//! Todo item domain model.
//!
//! # Responsibility
//! - Define the single persisted record and its insert input.
//! - Own the two-state completion lifecycle (`complete` / `cancel`).
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another item.
//! - `text` is never blank.
//! - `completed_at`, when set, is not earlier than `created_at`.
//! - Timestamps carry millisecond precision so storage round-trips are exact.

use chrono::{DateTime, SubsecRound, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier of a todo item.
pub type TodoId = i64;

/// Completion state derived from `completed_at` presence.
///
/// Also used as the list filter: every item matches exactly one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoStatus {
    /// No completion timestamp. Initial state.
    InProgress,
    /// Completion timestamp present.
    Completed,
}

impl TodoStatus {
    /// Maps the optional `isCompleted` flag used by list callers.
    pub fn from_completed_flag(is_completed: bool) -> Self {
        if is_completed {
            Self::Completed
        } else {
            Self::InProgress
        }
    }

    /// Stable lowercase name used in log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

/// Validation errors for todo records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    BlankText,
    CompletedBeforeCreated {
        created_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText => write!(f, "text must not be blank"),
            Self::CompletedBeforeCreated {
                created_at,
                completed_at,
            } => write!(
                f,
                "completed_at ({}) must be >= created_at ({})",
                completed_at.to_rfc3339(),
                created_at.to_rfc3339()
            ),
        }
    }
}

impl Error for TodoValidationError {}

/// Persisted todo record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// `None` while in progress.
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoItem {
    /// Returns the lifecycle state of this item.
    pub fn status(&self) -> TodoStatus {
        match self.completed_at {
            Some(_) => TodoStatus::Completed,
            None => TodoStatus::InProgress,
        }
    }

    /// Marks the item completed at the current time.
    ///
    /// Completing an already completed item refreshes the timestamp.
    pub fn complete_now(&mut self) {
        self.complete_at(now_millis());
    }

    /// Marks the item completed at `at`.
    ///
    /// `at` is clamped to `created_at` so a wall clock stepping backwards
    /// cannot produce a completion earlier than creation.
    pub fn complete_at(&mut self, at: DateTime<Utc>) {
        self.completed_at = Some(at.max(self.created_at));
    }

    /// Moves the item back to in progress. No-op when already in progress.
    pub fn cancel(&mut self) {
        self.completed_at = None;
    }

    /// Checks record invariants before persistence.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_fields(&self.text, self.created_at, self.completed_at)
    }
}

/// Insert input for the store.
///
/// `id` is normally `None` so the store allocates one. An explicit id is
/// accepted for seeding/import paths and must not collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub id: Option<TodoId>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl NewTodo {
    /// Creates an in-progress item input created now.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            created_at: now_millis(),
            completed_at: None,
        }
    }

    /// Creates an input that requests a specific identifier.
    pub fn with_id(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            ..Self::new(text)
        }
    }

    /// Builder-style completion timestamp, clamped like `TodoItem::complete_at`.
    pub fn completed(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at.max(self.created_at));
        self
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_fields(&self.text, self.created_at, self.completed_at)
    }

    /// Binds the store-assigned id and produces the persisted shape.
    pub fn into_item(self, id: TodoId) -> TodoItem {
        TodoItem {
            id,
            text: self.text,
            created_at: self.created_at,
            completed_at: self.completed_at,
        }
    }
}

/// Current UTC time truncated to millisecond precision.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Rejects blank text. Shared by request validation and record validation.
pub fn validate_text(text: &str) -> Result<(), TodoValidationError> {
    if text.trim().is_empty() {
        return Err(TodoValidationError::BlankText);
    }
    Ok(())
}

fn validate_fields(
    text: &str,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
) -> Result<(), TodoValidationError> {
    validate_text(text)?;
    if let Some(completed_at) = completed_at {
        if completed_at < created_at {
            return Err(TodoValidationError::CompletedBeforeCreated {
                created_at,
                completed_at,
            });
        }
    }
    Ok(())
}
