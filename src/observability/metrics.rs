//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status
//! - `proxy_request_duration_seconds` (histogram): handler latency by method
//! - `proxy_upstream_errors_total` (counter): upstream failures by kind
//!
//! The `method` label only takes `GET`, `OPTIONS` or `other`; arbitrary
//! method tokens must not mint new series.
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Collapse an inbound method into the fixed label set.
pub fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "OPTIONS" => "OPTIONS",
        _ => "other",
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    let method = method_label(method);
    metrics::counter!(
        "proxy_requests_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("proxy_request_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_error(kind: &'static str) {
    metrics::counter!("proxy_upstream_errors_total", "kind" => kind).increment(1);
}
