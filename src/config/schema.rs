//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the portal.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the portal backend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PortalConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Row store connection settings.
    pub database: DatabaseConfig,

    /// Credential hashing parameters.
    pub auth: AuthConfig,

    /// HTTP layer limits.
    pub http: HttpConfig,

    /// Spreadsheet export settings.
    pub export: ExportConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".to_string(),
        }
    }
}

/// Which row store implementation to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mysql,
    Memory,
}

/// Row store connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Database (schema) name.
    pub name: String,

    /// Pool size.
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection before failing.
    pub acquire_timeout_secs: u64,

    /// Connection attempts at startup before giving up.
    pub connect_attempts: u32,
    pub backoff_base_ms: u64,
    pub backoff_max_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Mysql,
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            name: "portal".to_string(),
            max_connections: 5,
            acquire_timeout_secs: 10,
            connect_attempts: 5,
            backoff_base_ms: 200,
            backoff_max_ms: 5_000,
        }
    }
}

/// Argon2id cost parameters. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        // OWASP minimum recommendation for Argon2id.
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// HTTP layer limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Answer CORS preflights and allow any origin.
    pub cors_enabled: bool,

    /// Request timeout in seconds. Unset means requests may wait on the store indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024,
            cors_enabled: true,
            request_timeout_secs: None,
        }
    }
}

/// Spreadsheet export settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub sheet_name: String,
    /// Filename advertised in `Content-Disposition`.
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Reports".to_string(),
            filename: "reports.xlsx".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,

    pub log_format: LogFormat,

    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics listen address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "report_portal=info,tower_http=info,sqlx=warn".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
