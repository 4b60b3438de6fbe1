//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Startup store connection:
//!     → attempt connect
//!     → On failure: backoff.rs (exponential delay + jitter), try again
//!     → After the configured attempts: fatal, process exits non-zero
//! ```
//!
//! # Design Decisions
//! - Only startup is retried; request handlers never retry a store call
//! - The pool re-establishes dropped connections on its own after startup

pub mod backoff;
