//! Startup orchestration.
//!
//! # Responsibilities
//! - Connect the configured row store, retrying with backoff
//! - Build the credential hasher and export encoder from config
//!
//! # Design Decisions
//! - Subsystems initialize in order, not concurrently
//! - Exhausting the connection attempts is reported as an error; `main` exits non-zero

use std::sync::Arc;

use thiserror::Error;

use crate::config::{DatabaseConfig, PortalConfig, StoreBackend};
use crate::credentials::{Argon2Hasher, HashError};
use crate::export::XlsxEncoder;
use crate::http::AppState;
use crate::resilience::backoff::Backoff;
use crate::store::{MemoryStore, MySqlStore, RowStore, StoreError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database unreachable after {attempts} attempts: {source}")]
    Store {
        attempts: u32,
        #[source]
        source: StoreError,
    },

    #[error("credential hasher: {0}")]
    Hasher(#[from] HashError),
}

/// Connect the configured store.
pub async fn connect_store(config: &DatabaseConfig) -> Result<Arc<dyn RowStore>, StartupError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Mysql => {
            let store = connect_mysql(config).await?;
            Ok(Arc::new(store))
        }
    }
}

async fn connect_mysql(config: &DatabaseConfig) -> Result<MySqlStore, StartupError> {
    let backoff = Backoff::new(config.backoff_base_ms, config.backoff_max_ms);
    let mut attempt = 0;

    tracing::info!(host = %config.host, database = %config.name, "Connecting to database");
    loop {
        attempt += 1;
        match MySqlStore::connect(config).await {
            Ok(store) => {
                tracing::info!(attempt, "Connected to MySQL database");
                return Ok(store);
            }
            Err(e) if attempt < config.connect_attempts => {
                let delay = backoff.delay(attempt);
                tracing::warn!(attempt, error = %e, delay = ?delay, "Database connection failed, retrying");
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                tracing::error!(attempt, error = %e, "Database connection failed");
                return Err(StartupError::Store {
                    attempts: attempt,
                    source: e,
                });
            }
        }
    }
}

/// Build the handler state around an already connected store.
pub fn build_state(config: &PortalConfig, store: Arc<dyn RowStore>) -> Result<AppState, StartupError> {
    let hasher = Argon2Hasher::new(&config.auth)?;
    Ok(AppState::new(
        store,
        Arc::new(hasher),
        Arc::new(XlsxEncoder::new(config.export.sheet_name.clone())),
        config.export.filename.clone(),
    ))
}
