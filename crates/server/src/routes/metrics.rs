//! Prometheus metrics endpoint

use axum::Extension;
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics - Request and extraction metrics in Prometheus text format
pub async fn get(Extension(handle): Extension<PrometheusHandle>) -> String {
    handle.render()
}
