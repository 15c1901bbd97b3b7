//! Prometheus metrics for tusk-server.
//!
//! Exposes server metrics in Prometheus format at the `/metrics` endpoint.

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder and return a handle for rendering.
///
/// Must be called once at server startup before any metrics are recorded.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    describe_counter!(
        "tusk_http_requests_total",
        "Total number of HTTP requests processed"
    );
    describe_histogram!(
        "tusk_http_request_duration_seconds",
        "Duration of HTTP requests in seconds"
    );

    handle
}

/// Record one finished HTTP request.
pub fn record_http_request(method: &str, status: u16, duration: Duration) {
    counter!(
        "tusk_http_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "tusk_http_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(duration.as_secs_f64());
}
