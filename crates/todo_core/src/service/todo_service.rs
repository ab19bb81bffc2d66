//! Todo use-case service.
//!
//! # Responsibility
//! - Own the business rules: upsert decision, completion and cancellation,
//!   not-found signaling.
//! - Map stored records to `TodoResponse` for callers.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Operations that address an existing item fail with `TodoNotFound`
//!   instead of creating one.
//! - Deletes are idempotent.

use crate::dto::todo_dto::{TodoResponse, TodoSaveRequest};
use crate::model::todo::{NewTodo, TodoId, TodoItem, TodoStatus, TodoValidationError};
use crate::repo::todo_repo::{RepoError, TodoListQuery, TodoRepository};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TodoServiceResult<T> = Result<T, TodoServiceError>;

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Target item does not exist.
    TodoNotFound(TodoId),
    /// Input or record failed validation.
    Validation(TodoValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TodoNotFound(id) => write!(f, "todo not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::TodoNotFound(_) => None,
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TodoNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Todo service facade over repository implementations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every item, or only those in `status` when given.
    pub fn get_all(&self, status: Option<TodoStatus>) -> TodoServiceResult<Vec<TodoResponse>> {
        let todos = self.repo.list_todos(&TodoListQuery { status })?;
        debug!(
            "event=todo_list module=service status=ok filter={} count={}",
            status.map_or("all", TodoStatus::as_str),
            todos.len()
        );
        Ok(todos.into_iter().map(TodoResponse::from).collect())
    }

    /// Creates an item when `request.id` is absent, otherwise replaces the
    /// text of the existing item and keeps its completion state.
    pub fn upsert(&self, request: &TodoSaveRequest) -> TodoServiceResult<TodoResponse> {
        request.validate()?;

        match request.id {
            None => {
                let created = self.repo.insert_todo(&NewTodo::new(request.text.clone()))?;
                info!(
                    "event=todo_create module=service status=ok id={}",
                    created.id
                );
                Ok(created.into())
            }
            Some(id) => {
                let mut todo = self.load(id)?;
                todo.text = request.text.clone();
                self.repo.update_todo(&todo)?;
                info!("event=todo_update module=service status=ok id={id}");
                Ok(todo.into())
            }
        }
    }

    /// Sets the completion time to now. Refreshes it when already completed.
    pub fn complete(&self, id: TodoId) -> TodoServiceResult<TodoResponse> {
        let mut todo = self.load(id)?;
        let from = todo.status().as_str();
        todo.complete_now();
        self.repo.update_todo(&todo)?;
        info!("event=todo_complete module=service status=ok id={id} from={from}");
        Ok(todo.into())
    }

    /// Clears the completion time. No-op on in-progress items.
    pub fn cancel(&self, id: TodoId) -> TodoServiceResult<TodoResponse> {
        let mut todo = self.load(id)?;
        let from = todo.status().as_str();
        todo.cancel();
        self.repo.update_todo(&todo)?;
        info!("event=todo_cancel module=service status=ok id={id} from={from}");
        Ok(todo.into())
    }

    pub fn get_one(&self, id: TodoId) -> TodoServiceResult<TodoResponse> {
        self.load(id).map(TodoResponse::from)
    }

    /// Deletes one item; succeeds silently when it does not exist.
    pub fn delete_one(&self, id: TodoId) -> TodoServiceResult<()> {
        let removed = self.repo.delete_todo(id)?;
        info!("event=todo_delete module=service status=ok id={id} removed={removed}");
        Ok(())
    }

    pub fn delete_all(&self) -> TodoServiceResult<()> {
        let removed = self.repo.delete_all_todos()?;
        info!("event=todo_delete_all module=service status=ok removed={removed}");
        Ok(())
    }

    fn load(&self, id: TodoId) -> TodoServiceResult<TodoItem> {
        self.repo
            .get_todo(id)?
            .ok_or(TodoServiceError::TodoNotFound(id))
    }
}
