//! HTTP routes for the token authorizer.

use crate::handlers::{self, authorize_handler::handle_authorize, authorize_handler::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application routes.
///
/// - `/api/v1/authorize` - Evaluate an authorizer request (POST)
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus metrics
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let authorize_routes = Router::new()
        .route("/api/v1/authorize", post(handle_authorize))
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    authorize_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
}
