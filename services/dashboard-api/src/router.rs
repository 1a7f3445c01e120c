//! Route table.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Build the service router around `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        // Climate table
        .route("/api/table", get(handlers::table::table_handler))
        .route("/api/table/series", get(handlers::table::series_handler))
        // Gridded dataset
        .route(
            "/api/dataset",
            get(handlers::dataset::dataset_handler).put(handlers::dataset::upload_handler),
        )
        // Map and selection
        .route("/api/grid/cells", get(handlers::grid::cells_handler))
        .route(
            "/api/grid/selection",
            get(handlers::grid::selection_handler)
                .post(handlers::grid::click_handler)
                .delete(handlers::grid::clear_selection_handler),
        )
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
