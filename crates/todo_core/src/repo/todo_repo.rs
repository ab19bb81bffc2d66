//! Todo repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and filtered listing over canonical `todos` storage.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - Status filters are direct null checks on `completed_at`; neither is
//!   expressed as a negation of the other.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::todo::{NewTodo, TodoId, TodoItem, TodoStatus, TodoValidationError};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{ffi, params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_TABLE: &str = "todos";
const TODO_REQUIRED_COLUMNS: &[&str] = &["id", "text", "created_at", "completed_at"];

const TODO_SELECT_SQL: &str = "SELECT
    id,
    text,
    created_at,
    completed_at
FROM todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    DuplicateId(TodoId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::DuplicateId(id) => write!(f, "todo id already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it via db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing todos.
///
/// `status: None` lists every item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    pub status: Option<TodoStatus>,
}

impl TodoListQuery {
    pub fn with_status(status: TodoStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

/// Repository interface for todo storage.
pub trait TodoRepository {
    /// Stores a new item, allocating an id when `todo.id` is `None`.
    fn insert_todo(&self, todo: &NewTodo) -> RepoResult<TodoItem>;
    /// Replaces text and completion of the item with the same id.
    fn update_todo(&self, todo: &TodoItem) -> RepoResult<()>;
    fn get_todo(&self, id: TodoId) -> RepoResult<Option<TodoItem>>;
    /// Lists items ordered by id.
    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<TodoItem>>;
    /// Removes one item. Returns `false` when nothing matched.
    fn delete_todo(&self, id: TodoId) -> RepoResult<bool>;
    /// Removes every item and returns how many were removed.
    fn delete_all_todos(&self) -> RepoResult<usize>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what this repository reads and writes.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn insert_todo(&self, todo: &NewTodo) -> RepoResult<TodoItem> {
        todo.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO todos (
                id,
                text,
                created_at,
                completed_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                todo.id,
                todo.text.as_str(),
                todo.created_at.timestamp_millis(),
                todo.completed_at.map(|at| at.timestamp_millis()),
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(err) if is_primary_key_violation(&err) => {
                if let Some(id) = todo.id {
                    return Err(RepoError::DuplicateId(id));
                }
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        }

        let id = todo.id.unwrap_or_else(|| self.conn.last_insert_rowid());
        Ok(todo.clone().into_item(id))
    }

    fn update_todo(&self, todo: &TodoItem) -> RepoResult<()> {
        todo.validate()?;

        // created_at is immutable after insert.
        let changed = self.conn.execute(
            "UPDATE todos
             SET
                text = ?1,
                completed_at = ?2
             WHERE id = ?3;",
            params![
                todo.text.as_str(),
                todo.completed_at.map(|at| at.timestamp_millis()),
                todo.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(todo.id));
        }

        Ok(())
    }

    fn get_todo(&self, id: TodoId) -> RepoResult<Option<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<TodoItem>> {
        let mut sql = TODO_SELECT_SQL.to_string();
        if let Some(status) = query.status {
            sql.push_str(" WHERE ");
            sql.push_str(status_predicate(status));
        }
        sql.push_str(" ORDER BY id ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn delete_todo(&self, id: TodoId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn delete_all_todos(&self) -> RepoResult<usize> {
        let changed = self.conn.execute("DELETE FROM todos;", [])?;
        Ok(changed)
    }
}

fn status_predicate(status: TodoStatus) -> &'static str {
    match status {
        TodoStatus::Completed => "completed_at IS NOT NULL",
        TodoStatus::InProgress => "completed_at IS NULL",
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [TODO_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(TODO_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([TODO_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in TODO_REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name.as_str() == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: TODO_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<TodoItem> {
    let created_at = parse_millis(row.get("created_at")?, "created_at")?;
    let completed_at = match row.get::<_, Option<i64>>("completed_at")? {
        Some(value) => Some(parse_millis(value, "completed_at")?),
        None => None,
    };

    let todo = TodoItem {
        id: row.get("id")?,
        text: row.get("text")?,
        created_at,
        completed_at,
    };
    todo.validate()
        .map_err(|err| RepoError::InvalidData(format!("todo {}: {err}", todo.id)))?;
    Ok(todo)
}

fn parse_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(value).single().ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in todos.{column}"))
    })
}
