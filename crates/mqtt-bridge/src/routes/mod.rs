//! HTTP routes for the MQTT bridge.

use crate::handlers::{self, publish_handler::handle_publish, publish_handler::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application routes.
///
/// - `/api/v1/publish` - Publish the request body (POST)
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus metrics
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let publish_routes = Router::new()
        .route("/api/v1/publish", post(handle_publish))
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    publish_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
}
