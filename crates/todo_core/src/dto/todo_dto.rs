//! Todo request/response DTOs.

use crate::model::todo::{validate_text, TodoId, TodoItem, TodoValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Externally visible todo representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: TodoId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&TodoItem> for TodoResponse {
    fn from(todo: &TodoItem) -> Self {
        Self {
            id: todo.id,
            text: todo.text.clone(),
            completed_at: todo.completed_at,
        }
    }
}

impl From<TodoItem> for TodoResponse {
    fn from(todo: TodoItem) -> Self {
        Self {
            id: todo.id,
            text: todo.text,
            completed_at: todo.completed_at,
        }
    }
}

/// Create-or-update request.
///
/// `id: None` creates a new item; `Some(id)` replaces the text of an
/// existing one. Unknown JSON fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoSaveRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TodoId>,
    pub text: String,
}

impl TodoSaveRequest {
    pub fn create(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }

    pub fn update(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            text: text.into(),
        }
    }

    pub fn validate(&self) -> Result<(), TodoValidationError> {
        validate_text(&self.text)
    }
}
