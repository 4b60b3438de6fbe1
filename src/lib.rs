//! Lecturer reporting portal backend.
//!
//! Registration/login plus create-and-read endpoints for reports, ratings
//! and course assignments over a MySQL row store, with an Excel export of
//! all reports.

pub mod api;
pub mod config;
pub mod credentials;
pub mod export;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod store;

pub use config::PortalConfig;
pub use http::{AppState, HttpServer};
pub use lifecycle::Shutdown;
