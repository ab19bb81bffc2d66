//! Todo and health HTTP routes.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use todo_core::{TodoId, TodoResponse, TodoSaveRequest, TodoStatus};

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct ListTodosQuery {
    /// `true` lists completed items, `false` in-progress ones, absent lists all.
    #[serde(default, rename = "isCompleted")]
    pub is_completed: Option<String>,
}

impl ListTodosQuery {
    /// Resolves the requested status filter.
    ///
    /// An empty value means no filter. Accepts `true/false`, `1/0`, `yes/no`
    /// and `on/off` in any case.
    pub fn status(&self) -> ApiResult<Option<TodoStatus>> {
        let raw = match self.is_completed.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };

        let is_completed = match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => return Err(invalid_flag(raw)),
        };
        Ok(Some(TodoStatus::from_completed_flag(is_completed)))
    }
}

fn invalid_flag(raw: &str) -> ApiError {
    ApiError::BadRequest(format!("isCompleted must be a boolean, got `{raw}`"))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ==================
// Routers
// ==================

pub fn todo_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/todos",
            get(list_todos).post(save_todo).delete(delete_all_todos),
        )
        .route("/todos/:id", get(get_todo).delete(delete_todo))
        .route("/todos/:id/complete", put(complete_todo))
        .route("/todos/:id/cancel", put(cancel_todo))
        .with_state(state)
}

pub fn health_routes() -> Router {
    Router::new().route("/health", get(health))
}

// ==================
// Handlers
// ==================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: todo_core::core_version(),
    })
}

async fn list_todos(
    State(state): State<AppState>,
    query: Result<Query<ListTodosQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<TodoResponse>>> {
    let Query(query) = query.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let status = query.status()?;
    let todos = state
        .with_service(move |service| service.get_all(status))
        .await?;
    Ok(Json(todos))
}

/// Creates when the body has no `id`, otherwise updates that item.
async fn save_todo(
    State(state): State<AppState>,
    request: Result<Json<TodoSaveRequest>, JsonRejection>,
) -> ApiResult<Json<TodoResponse>> {
    let Json(request) = request.map_err(|err| ApiError::BadRequest(err.body_text()))?;
    let todo = state
        .with_service(move |service| service.upsert(&request))
        .await?;
    Ok(Json(todo))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state
        .with_service(move |service| service.get_one(id))
        .await?;
    Ok(Json(todo))
}

async fn complete_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state
        .with_service(move |service| service.complete(id))
        .await?;
    Ok(Json(todo))
}

async fn cancel_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state
        .with_service(move |service| service.cancel(id))
        .await?;
    Ok(Json(todo))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> ApiResult<StatusCode> {
    state
        .with_service(move |service| service.delete_one(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_all_todos(State(state): State<AppState>) -> ApiResult<StatusCode> {
    state.with_service(|service| service.delete_all()).await?;
    Ok(StatusCode::NO_CONTENT)
}
