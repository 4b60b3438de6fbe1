//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (pool size > 0, Argon2 costs, timeouts)
//! - Check addresses parse before anything binds
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PortalConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{PortalConfig, StoreBackend};

/// Characters Excel refuses in worksheet names.
const SHEET_NAME_FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate the whole configuration, collecting every error.
pub fn validate_config(config: &PortalConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let db = &config.database;
    if db.backend == StoreBackend::Mysql {
        for (field, value) in [
            ("database.host", &db.host),
            ("database.user", &db.user),
            ("database.name", &db.name),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::new(field, "must not be empty"));
            }
        }
    }
    if db.max_connections == 0 {
        errors.push(ValidationError::new("database.max_connections", "must be at least 1"));
    }
    if db.acquire_timeout_secs == 0 {
        errors.push(ValidationError::new("database.acquire_timeout_secs", "must be greater than 0"));
    }
    if db.connect_attempts == 0 {
        errors.push(ValidationError::new("database.connect_attempts", "must be at least 1"));
    }
    if db.backoff_base_ms > db.backoff_max_ms {
        errors.push(ValidationError::new(
            "database.backoff_base_ms",
            "must not exceed database.backoff_max_ms",
        ));
    }

    let auth = &config.auth;
    if auth.parallelism == 0 {
        errors.push(ValidationError::new("auth.parallelism", "must be at least 1"));
    }
    if auth.iterations == 0 {
        errors.push(ValidationError::new("auth.iterations", "must be at least 1"));
    }
    if auth.memory_kib < 8 * auth.parallelism.max(1) {
        errors.push(ValidationError::new(
            "auth.memory_kib",
            "must be at least 8 KiB per lane of parallelism",
        ));
    }

    if config.http.max_body_size == 0 {
        errors.push(ValidationError::new("http.max_body_size", "must be greater than 0"));
    }
    if config.http.request_timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            "http.request_timeout_secs",
            "must be greater than 0 when set",
        ));
    }

    let sheet = &config.export.sheet_name;
    if sheet.is_empty() || sheet.chars().count() > 31 {
        errors.push(ValidationError::new("export.sheet_name", "must be 1 to 31 characters"));
    } else if sheet.contains(SHEET_NAME_FORBIDDEN) {
        errors.push(ValidationError::new(
            "export.sheet_name",
            "must not contain any of [ ] : * ? / \\",
        ));
    }
    let filename = &config.export.filename;
    if filename.is_empty() || filename.contains(&['"', ';', '\r', '\n'][..]) {
        errors.push(ValidationError::new(
            "export.filename",
            "must be non-empty and free of quotes, semicolons and line breaks",
        ));
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
