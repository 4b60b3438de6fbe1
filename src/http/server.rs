//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request ID, body limit, CORS, metrics)
//! - Bind server to listener
//! - Serve until the shutdown signal fires, then drain

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::api;
use crate::config::PortalConfig;
use crate::credentials::CredentialHasher;
use crate::export::TabularEncoder;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::store::RowStore;

/// Application state injected into handlers.
///
/// Every collaborator is an owned handle, so tests can swap any of them.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RowStore>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub encoder: Arc<dyn TabularEncoder>,
    pub export_filename: Arc<str>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RowStore>,
        hasher: Arc<dyn CredentialHasher>,
        encoder: Arc<dyn TabularEncoder>,
        export_filename: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            store,
            hasher,
            encoder,
            export_filename: export_filename.into(),
        }
    }
}

/// HTTP server for the portal API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &PortalConfig, state: AppState) -> Self {
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &PortalConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .nest("/api", api::router())
            .route("/health", get(api::health::health))
            .route_layer(middleware::from_fn(metrics::track_requests))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.http.max_body_size));

        if let Some(secs) = config.http.request_timeout_secs {
            router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
        }
        if config.http.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        router.layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(propagate_request_id_layer()),
        )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
