//! Prometheus request metrics served at `/metrics`.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};

const NAMESPACE: &str = "health_points";
const ENDPOINT: &str = "/metrics";

/// Build the request metrics middleware.
///
/// # Errors
/// Returns [`std::io::Error`] when metric registration fails.
pub(crate) fn build_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new(NAMESPACE)
        .endpoint(ENDPOINT)
        .build()
        .map_err(|err| std::io::Error::other(format!("configure Prometheus metrics: {err}")))
}
