//! Core domain logic for the todo service.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod dto;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use dto::todo_dto::{TodoResponse, TodoSaveRequest};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget,
};
pub use model::todo::{NewTodo, TodoId, TodoItem, TodoStatus, TodoValidationError};
pub use repo::todo_repo::{
    RepoError, RepoResult, SqliteTodoRepository, TodoListQuery, TodoRepository,
};
pub use service::todo_service::{TodoService, TodoServiceError, TodoServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
