//! Operational endpoints.

use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// Liveness probe. Does not check any dependencies.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Prometheus scrape endpoint.
#[tracing::instrument(skip_all, name = "issuer.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
