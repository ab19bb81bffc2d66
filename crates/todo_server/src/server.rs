//! # HTTP Server
//!
//! Combines the todo and health routers, request logging, and optional CORS
//! into one axum server.

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use log::{info, warn};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::routes::{health_routes, todo_routes};
use crate::state::AppState;

/// HTTP server for the todo API
pub struct TodoServer {
    config: ServerConfig,
    router: Router,
}

impl TodoServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        let router = build_router(&config, state);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Binds the configured address and serves until Ctrl-C.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;
        let local_addr = listener.local_addr()?;

        info!("event=server_start module=server status=ok addr={local_addr}");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("event=server_stop module=server status=ok addr={local_addr}");
        Ok(())
    }
}

/// Initializes process logging from `config`: rolling files when a log
/// directory is set, stderr otherwise.
pub fn init_logging(config: &ServerConfig) -> Result<(), ServerError> {
    let result = match &config.log_dir {
        Some(dir) => todo_core::init_logging(&config.log_level, dir),
        None => todo_core::init_stderr_logging(&config.log_level),
    };
    result.map_err(ServerError::Logging)
}

/// Builds the full router. Exposed so tests can drive it without a socket.
pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
    let router = Router::new()
        .merge(health_routes())
        .merge(todo_routes(state))
        .layer(middleware::from_fn(log_request));

    match cors_layer(&config.cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("event=cors_config module=server status=error origin={origin} error_code=invalid_origin");
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(parsed))
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;

    info!(
        "event=http_request module=server status={} method={} path={} duration_ms={}",
        response.status().as_u16(),
        method,
        path,
        started_at.elapsed().as_millis()
    );
    response
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_stop module=server status=error error_code=signal_failed error={err}");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::db::open_db_in_memory;

    fn state() -> AppState {
        AppState::new(open_db_in_memory().unwrap())
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = TodoServer::new(ServerConfig::with_port(8081), state());
        assert_eq!(server.socket_addr(), "127.0.0.1:8081");
    }

    #[test]
    fn test_cors_layer_only_when_origins_configured() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_some());
    }

    #[test]
    fn test_router_builds() {
        let config = ServerConfig {
            cors_origins: vec!["http://localhost:3000".to_string()],
            ..ServerConfig::default()
        };
        let _router = TodoServer::new(config, state()).router();
    }
}
