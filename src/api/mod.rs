//! Portal API handlers, mounted under `/api`.
//!
//! Each handler validates its input, performs at most one store operation
//! and maps the outcome through [`ApiError`](crate::http::ApiError).

pub mod health;
pub mod records;
pub mod reports;
pub mod users;

use axum::{
    routing::{get, post},
    Router,
};

use crate::http::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(users::register))
        .route("/login", post(users::login))
        .route("/report", post(reports::submit_report))
        .route("/reports", get(reports::list_reports))
        .route("/search-report", get(reports::search_reports))
        .route("/download-report", get(reports::download_report))
        .route("/rating", post(records::submit_rating))
        .route("/assign-course", post(records::assign_course))
}
