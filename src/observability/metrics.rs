//! Metrics collection and exposition.
//!
//! # Metrics
//! - `decoy_requests_total` (counter): requests by verdict, destination, render, status
//! - `decoy_request_duration_seconds` (histogram): end-to-end latency
//! - `decoy_upstream_failures_total` (counter): proxy fetch failures by kind
//!
//! # Design Decisions
//! - Prometheus exporter runs its own listener, separate from the gate
//! - Labels are low-cardinality enums only; never URLs or link ids

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

pub const REQUESTS_TOTAL: &str = "decoy_requests_total";
pub const REQUEST_DURATION: &str = "decoy_request_duration_seconds";
pub const UPSTREAM_FAILURES: &str = "decoy_upstream_failures_total";

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one routed request.
pub fn record_request(
    verdict: &'static str,
    destination: &'static str,
    render: &'static str,
    status: u16,
    start: Instant,
) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "verdict" => verdict,
        "destination" => destination,
        "render" => render,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(REQUEST_DURATION, "render" => render)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_failure(kind: &'static str) {
    metrics::counter!(UPSTREAM_FAILURES, "kind" => kind).increment(1);
}
