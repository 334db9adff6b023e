use axum::extract::State;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// Liveness probe handler.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Prometheus scrape endpoint.
#[tracing::instrument(skip_all, name = "bridge.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
