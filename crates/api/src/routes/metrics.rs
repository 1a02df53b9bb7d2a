//! Prometheus metrics endpoint.
//!
//! Exposes the placement counters emitted by the order service
//! (`orders_placement_attempts_total`, `orders_placed_total`,
//! `orders_rejected_total`) along with the placement duration histogram.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::PrometheusHandle;

/// GET /metrics — renders the current recorder contents in text exposition format.
pub async fn get(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    )
}
