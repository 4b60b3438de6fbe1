//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → DB_* environment overrides
//!     → validation.rs (semantic checks)
//!     → PortalConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, DatabaseConfig, ExportConfig, HttpConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, PortalConfig, StoreBackend,
};
