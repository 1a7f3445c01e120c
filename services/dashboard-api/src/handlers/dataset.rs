//! Gridded dataset upload and summary.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Query},
    Json,
};
use bytes::Bytes;
use climate_common::{DashboardError, DashboardResult, DatasetSummary, GriddedDataset};
use dashboard_core::dataset_summary;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ApiResult;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Original file name, recorded as the dataset source
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub generation: u64,
    pub dataset: DatasetSummary,
}

/// Parse uploaded bytes on the blocking pool.
pub async fn parse_upload(
    body: Bytes,
    variable: String,
    name: Option<String>,
) -> DashboardResult<GriddedDataset> {
    let task = tokio::task::spawn_blocking(move || {
        netcdf_parser::load_gridded_from_bytes(&body, &variable, name.as_deref())
            .map_err(DashboardError::from)
    });

    match task.await {
        Ok(result) => result,
        Err(e) => Err(DashboardError::UploadError(format!("parse task failed: {}", e))),
    }
}

/// PUT /api/dataset - Replace the dataset with an uploaded NetCDF file
///
/// The file is parsed before the session lock is taken, so a failed upload
/// leaves the previous dataset and selection in place.
pub async fn upload_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    body: Bytes,
) -> ApiResult<Json<UploadResponse>> {
    state.metrics.record_request("dataset_upload");
    let Query(query) = query?;
    let size = body.len() as u64;
    info!(bytes = size, name = ?query.name, "Received dataset upload");

    let result = parse_upload(body, state.config.grid.variable.clone(), query.name).await;

    let mut session = state.session.write().await;
    match session.on_dataset_uploaded(result) {
        Ok(generation) => {
            state.metrics.record_upload(size);
            let dataset = session
                .dataset()
                .map(dataset_summary)
                .ok_or_else(|| DashboardError::UploadError("dataset vanished".to_string()))?;
            Ok(Json(UploadResponse { generation, dataset }))
        }
        Err(e) => {
            state.metrics.record_upload_failure(e.code());
            Err(e.into())
        }
    }
}

/// GET /api/dataset - Summary of the current dataset
pub async fn dataset_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> ApiResult<Json<DatasetSummary>> {
    state.metrics.record_request("dataset");
    let session = state.session.read().await;
    let dataset = session
        .dataset()
        .ok_or_else(|| DashboardError::NotFound("no dataset has been uploaded".to_string()))?;
    Ok(Json(dataset_summary(dataset)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    #[tokio::test]
    async fn test_garbage_upload_is_upload_error() {
        let result = parse_upload(Bytes::from_static(b"CDF?garbage"), "tasmin".into(), None).await;
        assert!(matches!(result, Err(DashboardError::UploadError(_))));
    }

    #[tokio::test]
    async fn test_dataset_handler_without_upload() {
        let state = Arc::new(AppState::new(DashboardConfig::default()));
        let result = dataset_handler(Extension(state)).await;
        assert!(result.is_err());
    }
}
