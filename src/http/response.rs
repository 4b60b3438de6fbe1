//! Error taxonomy and response bodies.
//!
//! # Design Decisions
//! - Validation → 400, credentials → 401, everything else → 500
//! - 500 bodies carry a fixed per-endpoint message; the cause is only logged
//! - The spreadsheet export fails with plain text, not JSON

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::metrics;

/// `{message}` body shared by most responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors a handler can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input. No store access happened.
    #[error("{0}")]
    Validation(&'static str),

    /// Unknown username or wrong password; deliberately indistinguishable.
    #[error("Invalid credentials")]
    Unauthorized,

    /// Store, hashing or runtime failure behind a generic message.
    #[error("{0}")]
    Operation(&'static str),

    /// The spreadsheet could not be produced (including: no rows).
    #[error("Error generating Excel")]
    Export,

    #[error("Request body too large")]
    PayloadTooLarge,
}

impl ApiError {
    /// Log `cause` and hide it behind `message`.
    pub fn operation(message: &'static str, endpoint: &'static str, cause: impl Display) -> Self {
        tracing::error!(endpoint, error = %cause, "{message}");
        metrics::record_operation_error(endpoint);
        Self::Operation(message)
    }

    /// Log `cause` and answer with the export failure.
    pub fn export(cause: impl Display) -> Self {
        tracing::error!(endpoint = "download-report", error = %cause, "Error generating Excel");
        metrics::record_operation_error("download-report");
        Self::Export
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Operation(_) | ApiError::Export => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Export => (status, self.to_string()).into_response(),
            other => (status, Json(MessageBody::new(other.to_string()))).into_response(),
        }
    }
}
