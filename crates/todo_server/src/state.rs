//! Shared handler state.
//!
//! # Invariants
//! - One SQLite connection per process, guarded by a mutex; requests are
//!   serialized on it.
//! - Service calls run on the blocking pool, never on async worker threads.

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult, ServerError};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use todo_core::db::{open_db, open_db_in_memory};
use todo_core::{SqliteTodoRepository, TodoService, TodoServiceResult};

#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps an already migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens the database described by `config` and applies migrations.
    pub fn open(config: &ServerConfig) -> Result<Self, ServerError> {
        let conn = if config.in_memory {
            open_db_in_memory()?
        } else {
            open_db(config.resolved_db_path())?
        };
        Ok(Self::new(conn))
    }

    /// Runs `f` against a service bound to the shared connection.
    pub async fn with_service<T, F>(&self, f: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&TodoService<SqliteTodoRepository<'_>>) -> TodoServiceResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| ApiError::Internal("database connection lock poisoned".to_string()))?;
            let repo = SqliteTodoRepository::try_new(&guard)?;
            let service = TodoService::new(repo);
            f(&service).map_err(ApiError::from)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("blocking task failed: {err}")))?
    }
}
