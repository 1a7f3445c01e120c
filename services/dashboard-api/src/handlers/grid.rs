//! Map cells and grid box selection.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Query,
    },
    Json,
};
use climate_common::{BoundingBox, CellId, DashboardError};
use dashboard_core::{selection_view, visible_cells, CellsView, SelectionView};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CellsQuery {
    /// `minlon,minlat,maxlon,maxlat`; the configured box when absent
    pub bbox: Option<String>,
}

/// Body of a click event.
#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub id: ClickId,
    /// Generation of the cell list the click was made on
    #[serde(default)]
    pub generation: Option<u64>,
}

impl ClickRequest {
    pub fn new(id: ClickId) -> Self {
        Self { id, generation: None }
    }

    pub fn on_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }
}

/// The clicked point's hover text, sent as a string or a bare number.
///
/// Any other JSON value is kept as-is and fails identifier parsing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ClickId {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl ClickId {
    fn as_text(&self) -> String {
        match self {
            ClickId::Number(n) => n.to_string(),
            ClickId::Text(s) => s.clone(),
            ClickId::Other(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SelectionAck {
    /// Whether the click payload was a valid identifier
    pub accepted: bool,
    pub selected: Option<CellId>,
    pub generation: u64,
}

/// GET /api/grid/cells - Cells of the current dataset inside a box
pub async fn cells_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<CellsQuery>, QueryRejection>,
) -> ApiResult<Json<CellsView>> {
    state.metrics.record_request("grid_cells");
    let Query(query) = query?;

    let bbox = match &query.bbox {
        Some(raw) => BoundingBox::from_bbox_string(raw)
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => state.config.grid.bbox,
    };

    let session = state.session.read().await;
    let view = visible_cells(&session, &bbox)
        .ok_or_else(|| DashboardError::NotFound("no dataset has been uploaded".to_string()))?;
    Ok(Json(view))
}

/// POST /api/grid/selection - A map point was clicked
///
/// An unparseable identifier, or one taken from a cell list of an older
/// dataset, is logged and ignored; the response reports the selection that is
/// in effect.
pub async fn click_handler(
    Extension(state): Extension<Arc<AppState>>,
    request: Result<Json<ClickRequest>, JsonRejection>,
) -> ApiResult<Json<SelectionAck>> {
    state.metrics.record_request("grid_click");
    let Json(request) = request?;

    let mut session = state.session.write().await;
    let current = session.generation();

    let accepted = match request.generation {
        Some(generation) if generation != current => {
            warn!(
                payload = %request.id.as_text(),
                click_generation = generation,
                current_generation = current,
                "Ignoring click on a replaced dataset"
            );
            false
        }
        _ => session.on_cell_clicked(&request.id.as_text()).is_some(),
    };
    if accepted {
        state.metrics.record_cell_click();
    }

    Ok(Json(SelectionAck {
        accepted,
        selected: session.selected(),
        generation: current,
    }))
}

/// DELETE /api/grid/selection - Clear the selection
pub async fn clear_selection_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<SelectionAck> {
    state.metrics.record_request("grid_clear");

    let mut session = state.session.write().await;
    session.clear_selection();

    Json(SelectionAck {
        accepted: true,
        selected: None,
        generation: session.generation(),
    })
}

/// GET /api/grid/selection - Info line and time series of the selection
pub async fn selection_handler(Extension(state): Extension<Arc<AppState>>) -> Json<SelectionView> {
    state.metrics.record_request("grid_selection");
    let session = state.session.read().await;
    Json(selection_view(&session, &state.config.grid.variable))
}
