//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route, method, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_upstream_failures_total` (counter): failed third-party calls by upstream
//! - `gateway_aggregation_runs_total` (counter): aggregation runs
//! - `gateway_aggregation_sources_failed` (histogram): failed sources per run
//!
//! Recording is a no-op until `init_metrics` installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed inbound request.
pub fn record_request(route: &str, method: &str, status: u16, start: Instant) {
    let route = route.to_string();
    counter!(
        "gateway_requests_total",
        "route" => route.clone(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed call to a third-party API.
pub fn record_upstream_failure(upstream: &'static str) {
    counter!("gateway_upstream_failures_total", "upstream" => upstream).increment(1);
}

/// Record one aggregation run and how many of its sources failed.
pub fn record_aggregation(sources: usize, failed: usize) {
    counter!("gateway_aggregation_runs_total").increment(1);
    histogram!("gateway_aggregation_sources_failed").record(failed as f64);
    if failed == sources && sources > 0 {
        tracing::warn!(sources, "Every aggregation source failed");
    }
}
