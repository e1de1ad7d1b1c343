//! Metrics collection and exposition.
//!
//! # Metrics
//! - `facade_requests_total` (counter): inbound requests by method, endpoint, status
//! - `facade_request_duration_seconds` (histogram): inbound latency
//! - `facade_backend_calls_total` (counter): backend calls by operation, status
//! - `facade_backend_call_duration_seconds` (histogram): backend latency by operation
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, endpoint: &str, status: u16, started: Instant) {
    ::metrics::counter!(
        "facade_requests_total",
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("facade_request_duration_seconds", "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

pub fn record_backend_call(op: &'static str, status: u16, started: Instant) {
    ::metrics::counter!(
        "facade_backend_calls_total",
        "op" => op,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("facade_backend_call_duration_seconds", "op" => op)
        .record(started.elapsed().as_secs_f64());
}
