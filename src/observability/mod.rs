//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (pretty for development, JSON for log shipping)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every span via `x-request-id`
//! - Store and hashing errors are logged here, never returned to clients
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
