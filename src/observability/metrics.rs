//! Metrics collection and exposition.
//!
//! # Metrics
//! - `portal_requests_total` (counter): requests by method, endpoint, status
//! - `portal_request_duration_seconds` (histogram): latency distribution
//! - `portal_operation_errors_total` (counter): requests answered with a generic 500, by endpoint

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`. Must run inside the Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, endpoint: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("endpoint", endpoint.to_string()),
        ("status", status.to_string()),
    ];
    metrics::counter!("portal_requests_total", &labels).increment(1);
    metrics::histogram!("portal_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a failure that was mapped to a generic 500.
pub fn record_operation_error(endpoint: &'static str) {
    metrics::counter!("portal_operation_errors_total", "endpoint" => endpoint).increment(1);
}

/// Route-level middleware feeding [`record_request`].
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = request.method().to_string();

    let response = next.run(request).await;
    record_request(&method, &endpoint, response.status().as_u16(), start);
    response
}
