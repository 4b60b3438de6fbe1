//! Lecturer reports: submission, listing, search and spreadsheet export.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::api::records::free_form_row;
use crate::http::{ApiError, AppState, JsonBody, MessageBody};
use crate::store::{Row, Table};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Substring to look for. Absent behaves like empty and matches every named lecturer.
    pub lecturer_name: Option<String>,
}

pub async fn submit_report(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> Result<Json<MessageBody>, ApiError> {
    let row = free_form_row(body)?;
    state
        .store
        .insert_row(Table::Report, &row)
        .await
        .map_err(|e| ApiError::operation("Report failed", "report", e))?;
    Ok(Json(MessageBody::new("Report submitted")))
}

pub async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = state
        .store
        .fetch_all(Table::Report)
        .await
        .map_err(|e| ApiError::operation("Fetch failed", "reports", e))?;
    Ok(Json(rows))
}

/// Substring search on `lecturer_name`.
///
/// A request without the parameter searches for the empty string, so it
/// returns every report whose lecturer name is set rather than matching the
/// literal text "undefined".
pub async fn search_reports(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Row>>, ApiError> {
    let needle = params.lecturer_name.unwrap_or_default();
    let rows = state
        .store
        .search_reports(&needle)
        .await
        .map_err(|e| ApiError::operation("Search failed", "search-report", e))?;
    tracing::debug!(needle = %needle, matches = rows.len(), "Report search");
    Ok(Json(rows))
}

pub async fn download_report(State(state): State<AppState>) -> Result<Response, ApiError> {
    let rows = state
        .store
        .fetch_all(Table::Report)
        .await
        .map_err(ApiError::export)?;
    if rows.is_empty() {
        return Err(ApiError::export("report table is empty"));
    }

    let content_type = HeaderValue::from_static(state.encoder.content_type());
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename={}",
        state.export_filename
    ))
    .map_err(ApiError::export)?;

    let row_count = rows.len();
    let encoder = state.encoder.clone();
    let document = tokio::task::spawn_blocking(move || encoder.encode(&rows))
        .await
        .map_err(ApiError::export)?
        .map_err(ApiError::export)?;

    tracing::info!(rows = row_count, bytes = document.len(), "Report export generated");
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document,
    )
        .into_response())
}
