//! Free-form record submissions: ratings and course assignments.

use axum::{extract::State, Json};
use chrono::Local;
use serde_json::Value;

use crate::http::{ApiError, AppState, JsonBody, MessageBody};
use crate::store::{first_invalid_column, Row, Table};

/// Column stamped onto every rating.
pub const DATE_SUBMITTED: &str = "date_submitted";

/// Format of `date_submitted`, accepted by a MySQL `DATETIME(3)` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Accept a JSON object whose keys are all plain column identifiers.
pub fn free_form_row(body: Value) -> Result<Row, ApiError> {
    let Value::Object(row) = body else {
        return Err(ApiError::Validation("Invalid request body"));
    };
    if let Some(column) = first_invalid_column(&row) {
        tracing::debug!(column = %column, "Rejected column name");
        return Err(ApiError::Validation("Invalid field name"));
    }
    Ok(row)
}

pub async fn submit_rating(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<MessageBody>, ApiError> {
    let mut row = free_form_row(body)?;
    let now = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();
    row.insert(DATE_SUBMITTED.to_string(), Value::String(now));

    state
        .store
        .insert_row(Table::Rating, &row)
        .await
        .map_err(|e| ApiError::operation("Rating failed", "rating", e))?;
    Ok(Json(MessageBody::new("Rating submitted")))
}

pub async fn assign_course(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<MessageBody>, ApiError> {
    let row = free_form_row(body)?;
    state
        .store
        .insert_row(Table::Assignment, &row)
        .await
        .map_err(|e| ApiError::operation("Assignment failed", "assign-course", e))?;
    Ok(Json(MessageBody::new("Course assigned")))
}
