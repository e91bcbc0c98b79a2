//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Data store configuration
    pub store: StoreConfig,
    /// Static asset locations
    pub assets: AssetsConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Data store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Connection string; `memory` selects the in-memory store
    pub database_url: String,
    /// Upper bound for a single store call (in seconds)
    pub timeout_secs: u64,
}

/// Static asset configuration
#[derive(Debug, Clone)]
pub struct AssetsConfig {
    /// Directory holding `index.html`
    pub views_dir: PathBuf,
    /// Directory served for any path no route matches
    pub public_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            store: StoreConfig {
                database_url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:exercise-tracker.db".to_string()),
                timeout_secs: env::var("STORE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .filter(|t| *t > 0)
                    .unwrap_or(10),
            },
            assets: AssetsConfig {
                views_dir: env::var_os("VIEWS_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("views")),
                public_dir: env::var_os("PUBLIC_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("public")),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl StoreConfig {
    /// Store call timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
