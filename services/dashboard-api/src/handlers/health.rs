//! Health and metrics handlers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// The service can answer every endpoint (possibly with placeholders)
    pub ready: bool,
    pub table_loaded: bool,
    pub dataset_loaded: bool,
    /// Why the table is missing, if it failed to load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_error: Option<String>,
    pub generation: u64,
}

/// GET /health - Basic health check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// GET /ready - Reports which session slots are filled.
///
/// A missing table or dataset does not make the service unready: the
/// dashboard shows placeholders for both.
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Json<ReadyResponse> {
    let session = state.session.read().await;
    Json(ReadyResponse {
        ready: true,
        table_loaded: session.table().is_some(),
        dataset_loaded: session.dataset().is_some(),
        table_error: session.table_error().map(|e| e.to_string()),
        generation: session.generation(),
    })
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let body = match &state.prometheus {
        Some(handle) => handle.render(),
        None => state.metrics.snapshot().to_prometheus_text(),
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
        .into_response()
}
