//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by method, status, outcome
//! - `relay_request_duration_seconds` (histogram): time to response headers
//! - `relay_origin_decisions_total` (counter): origin gate decisions
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Outcome label is the relay error code, or `relayed`

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Outcome label for requests that reached the upstream.
pub const RELAYED: &str = "relayed";

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Fails if a global recorder is already installed.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    metrics::histogram!(
        "relay_request_duration_seconds",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one origin gate decision.
pub fn record_origin_decision(decision: &'static str) {
    metrics::counter!("relay_origin_decisions_total", "decision" => decision).increment(1);
}
