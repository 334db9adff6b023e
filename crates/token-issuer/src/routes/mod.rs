//! HTTP routes for the token issuer.

use crate::handlers::{self, token_handler::handle_issue_token, token_handler::AppState};
use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the application routes.
///
/// - `/api/v1/token` - Issue a token (GET or POST)
/// - `/health` - Liveness probe
/// - `/metrics` - Prometheus metrics
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let token_routes = Router::new()
        .route(
            "/api/v1/token",
            get(handle_issue_token).post(handle_issue_token),
        )
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    token_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
}
