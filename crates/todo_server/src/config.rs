//! Server configuration.
//!
//! Values come from an optional JSON file, then CLI flags and `TODO_*`
//! environment variables override them.

use crate::error::ServerError;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DB_FILE_NAME: &str = "todo.sqlite3";

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite file path. Falls back to `<temp_dir>/todo.sqlite3`.
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Use a transient in-memory database instead of a file.
    #[serde(default)]
    pub in_memory: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Absolute directory for rolling log files. Logs go to stderr when unset.
    #[serde(default)]
    pub log_dir: Option<String>,

    /// CORS allowed origins. CORS is disabled when empty.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    todo_core::default_log_level().to_string()
}

fn load_error(path: &Path, err: &dyn std::fmt::Display) -> ServerError {
    ServerError::Config(format!("cannot load `{}`: {err}", path.display()))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: None,
            in_memory: false,
            log_level: default_log_level(),
            log_dir: None,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Loads a JSON config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let raw = std::fs::read_to_string(path).map_err(|err| load_error(path, &err))?;
        serde_json::from_str(&raw).map_err(|err| load_error(path, &err))
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Database file used when not running in memory.
    pub fn resolved_db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) => path.clone(),
            None => std::env::temp_dir().join(DB_FILE_NAME),
        }
    }
}

/// Command line arguments for `todo-server`.
#[derive(Debug, Default, Parser)]
#[command(name = "todo-server", version, about = "REST backend for a to-do list")]
pub struct Args {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "TODO_HOST")]
    pub host: Option<String>,

    #[arg(long, env = "TODO_PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "TODO_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Keep all data in memory; it is lost on exit.
    #[arg(long)]
    pub in_memory: bool,

    /// trace|debug|info|warn|error
    #[arg(long, env = "TODO_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[arg(long, env = "TODO_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Allowed CORS origin; repeat for several.
    #[arg(long = "cors-origin")]
    pub cors_origins: Vec<String>,
}

impl Args {
    /// Resolves the effective configuration.
    pub fn into_config(self) -> Result<ServerConfig, ServerError> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(db_path) = self.db_path {
            config.db_path = Some(db_path);
        }
        if self.in_memory {
            config.in_memory = true;
        }
        if let Some(log_level) = self.log_level {
            config.log_level = log_level;
        }
        if let Some(log_dir) = self.log_dir {
            config.log_dir = Some(log_dir);
        }
        if !self.cors_origins.is_empty() {
            config.cors_origins = self.cors_origins;
        }

        if config.host.trim().is_empty() {
            return Err(ServerError::Config("host must not be empty".to_string()));
        }

        Ok(config)
    }
}
