//! HTTP surface for the todo service.
//!
//! # Responsibility
//! - Decode HTTP requests, dispatch to `todo_core::TodoService`, encode
//!   results or map domain errors to status codes.
//! - Own server configuration and process bootstrap.
//!
//! # Endpoints
//! - `GET /health`
//! - `GET|POST|DELETE /todos`
//! - `GET|DELETE /todos/{id}`
//! - `PUT /todos/{id}/complete`, `PUT /todos/{id}/cancel`

pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Args, ServerConfig};
pub use error::{ApiError, ApiResult, ServerError};
pub use server::{build_router, init_logging, TodoServer};
pub use state::AppState;
