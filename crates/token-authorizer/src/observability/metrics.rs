//! Metrics definitions for the token authorizer
//!
//! - `authorizer_` prefix, `_total` suffix for counters
//!
//! # Cardinality
//!
//! - `effect`: 2 values (Allow, Deny)
//! - `reason`: bounded by `JwtValidationError::reason` (8 values plus `none`)

use crate::models::Effect;
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus recorder and return the handle for `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {e}"))
}

/// Record an authorization decision
///
/// Metric: `authorizer_decisions_total`
/// Labels: `effect`, `reason`
pub fn record_authorization(effect: Effect, reason: Option<&'static str>) {
    counter!(
        "authorizer_decisions_total",
        "effect" => effect.as_str(),
        "reason" => reason.unwrap_or("none")
    )
    .increment(1);
}
