//! Lecturer reporting portal backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ axum router (/api/*) ──▶ handler ──▶ RowStore ──▶ MySQL
//!                     │                     │
//!                     │                     ├──▶ CredentialHasher (Argon2id)
//!                     │                     └──▶ TabularEncoder (xlsx)
//!                     │
//!                     └── request id · trace spans · body limit · CORS · metrics
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use report_portal::config::load_config;
use report_portal::lifecycle::{connect_store, signals::forward_signals, startup::build_state};
use report_portal::observability::{logging::init_logging, metrics::init_metrics};
use report_portal::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "report-portal")]
#[command(about = "Lecturer reporting portal backend", long_about = None)]
struct Args {
    /// Path to a TOML config file. DB_* environment variables override it.
    #[arg(short, long, env = "PORTAL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("report-portal: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "report-portal starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.database.name,
        backend = ?config.database.backend,
        "Configuration loaded"
    );

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: report_portal::PortalConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = connect_store(&config.database).await?;
    let state = build_state(&config, store)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(forward_signals(shutdown));

    let server = HttpServer::new(&config, state);
    server.run(listener, server_shutdown).await?;
    Ok(())
}
