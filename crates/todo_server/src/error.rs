//! HTTP and startup error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use thiserror::Error;
use todo_core::db::DbError;
use todo_core::{RepoError, TodoId, TodoServiceError};

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced to HTTP clients
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Addressed todo does not exist. Rendered as an empty 404.
    #[error("todo not found: {0}")]
    NotFound(TodoId),

    #[error("invalid request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TodoServiceError> for ApiError {
    fn from(err: TodoServiceError) -> Self {
        match err {
            TodoServiceError::TodoNotFound(id) => ApiError::NotFound(id),
            TodoServiceError::Validation(err) => ApiError::BadRequest(err.to_string()),
            TodoServiceError::Repo(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        TodoServiceError::from(err).into()
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::NotFound(_) => status.into_response(),
            ApiError::BadRequest(_) | ApiError::Internal(_) => {
                if status.is_server_error() {
                    error!(
                        "event=http_error module=server status=error code={} error={}",
                        status.as_u16(),
                        self
                    );
                }
                let body = Json(ErrorResponse {
                    error: self.to_string(),
                    code: status.as_u16(),
                });
                (status, body).into_response()
            }
        }
    }
}

/// Failures while bootstrapping or running the server process
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("database setup failed: {0}")]
    Db(#[from] DbError),

    #[error("server i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::TodoValidationError;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound(1).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::BadRequest("test".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("test".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_error_mapping() {
        let not_found = ApiError::from(TodoServiceError::TodoNotFound(9));
        assert!(matches!(not_found, ApiError::NotFound(9)));

        let invalid = ApiError::from(TodoServiceError::Validation(TodoValidationError::BlankText));
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);

        let repo = ApiError::from(RepoError::MissingRequiredTable("todos"));
        assert_eq!(repo.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_response_has_no_body() {
        let response = ApiError::NotFound(3).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get("content-type").is_none());
    }
}
