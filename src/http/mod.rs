//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, JSON body extraction)
//!     → api handlers (one store operation each)
//!     → response.rs (error taxonomy → status + body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{JsonBody, X_REQUEST_ID};
pub use response::{ApiError, MessageBody};
pub use server::{AppState, HttpServer};
