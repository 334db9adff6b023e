//! Metrics definitions for the MQTT bridge
//!
//! All metrics follow Prometheus naming conventions:
//! - `bridge_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! - `status`: 2 values (success, error)
//! - `stage`: bounded by `BridgeError::stage` plus `none`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize the Prometheus recorder and return the handle for `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        // Covers a full connect/publish/disconnect round trip, up to the
        // transport's connection timeout
        .set_buckets_for_metric(
            Matcher::Prefix("bridge_publish".to_string()),
            &[0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0],
        )
        .map_err(|e| format!("Failed to set publish buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {e}"))
}

/// Record one publish attempt
///
/// Metric: `bridge_publish_duration_seconds`, `bridge_publish_total`
/// Labels: `status`, `stage`
pub fn record_publish(status: &'static str, stage: Option<&'static str>, duration: Duration) {
    histogram!("bridge_publish_duration_seconds", "status" => status)
        .record(duration.as_secs_f64());

    counter!(
        "bridge_publish_total",
        "status" => status,
        "stage" => stage.unwrap_or("none")
    )
    .increment(1);
}
