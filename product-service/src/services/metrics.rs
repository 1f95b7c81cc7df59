//! Metrics collection for product-service.
//!
//! HTTP request metrics come from the shared middleware; this module owns the
//! Prometheus recorder and the per-operation outcome counter.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use service_core::error::AppError;
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const PRODUCT_OPERATIONS_TOTAL: &str = "product_operations_total";

/// Install the global Prometheus recorder. Calling it again is a no-op.
pub fn init_metrics() -> Result<(), AppError> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
        AppError::InternalError(anyhow::anyhow!(
            "failed to install Prometheus recorder: {}",
            e
        ))
    })?;

    metrics::describe_counter!(
        PRODUCT_OPERATIONS_TOTAL,
        "Product operations by operation and outcome"
    );

    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Count one product operation, e.g. `("update", "not_found")`.
pub fn record_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        PRODUCT_OPERATIONS_TOTAL,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
