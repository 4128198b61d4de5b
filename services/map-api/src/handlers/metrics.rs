//! Health check and metrics handlers.

use axum::{
    extract::Extension,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;

pub async fn health_handler() -> Response {
    Json(json!({
        "status": "ok",
        "service": "map-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

pub async fn metrics_handler(Extension(handle): Extension<PrometheusHandle>) -> Response {
    handle.render().into_response()
}
